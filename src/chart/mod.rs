// Environmental chart data preparation

pub mod timestamp;

use std::cmp::Ordering;

use serde::Serialize;

use crate::shipment::{ReadingKind, Shipment};

pub use timestamp::{chart_label, format_label, parse_timestamp};

/// One plotted sample, derived from a checkpoint that carries readings.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartPoint {
    /// X-axis label, e.g. "Feb 28 - 8:30AM"
    pub name: String,
    /// Checkpoint timestamp as it appears in the shipment record
    pub full_time: String,
    pub location: String,
    pub temperature: Option<f32>,
    pub humidity: Option<f32>,
    pub lux: Option<f32>,
    pub battery_life: Option<f32>,
    pub status: String,
    /// Whether this is the checkpoint at the shipment's current location
    pub is_current: bool,
}

impl ChartPoint {
    pub fn value(&self, kind: ReadingKind) -> Option<f32> {
        match kind {
            ReadingKind::Temperature => self.temperature,
            ReadingKind::Humidity => self.humidity,
            ReadingKind::Light => self.lux,
            ReadingKind::Battery => self.battery_life,
        }
    }

    /// Tooltip heading: `"<location> (<label>)"`.
    pub fn heading(&self) -> String {
        format!("{} ({})", self.location, self.name)
    }
}

/// Builds the chart series for a shipment.
///
/// Only checkpoints with environmental data contribute a point. Points are
/// ordered by parsed timestamp; pairs that cannot be compared keep their
/// input order.
pub fn prepare_chart_data(shipment: &Shipment) -> Vec<ChartPoint> {
    let mut points: Vec<ChartPoint> = shipment
        .checkpoints
        .iter()
        .filter_map(|checkpoint| {
            let reading = checkpoint.env_data.as_ref()?;
            Some(ChartPoint {
                name: chart_label(&checkpoint.time),
                full_time: checkpoint.time.clone(),
                location: checkpoint.location.clone(),
                temperature: reading.temperature,
                humidity: reading.humidity,
                lux: reading.lux,
                battery_life: reading.battery_life,
                status: checkpoint.status.clone(),
                is_current: shipment.is_current(checkpoint),
            })
        })
        .collect();

    sort_by_time(&mut points);
    points
}

// Insertion sort: the comparator is not a total order once unparseable
// timestamps are involved, which `slice::sort_by` does not allow.
fn sort_by_time(points: &mut [ChartPoint]) {
    let keys: Vec<_> = points.iter().map(|p| parse_timestamp(&p.full_time)).collect();
    let mut order: Vec<usize> = (0..points.len()).collect();

    for i in 1..order.len() {
        let mut j = i;
        while j > 0 && compare_keys(&keys[order[j - 1]], &keys[order[j]]) == Ordering::Greater {
            order.swap(j - 1, j);
            j -= 1;
        }
    }

    let sorted: Vec<ChartPoint> = order.iter().map(|&i| points[i].clone()).collect();
    points.clone_from_slice(&sorted);
}

fn compare_keys<T: Ord>(a: &Option<T>, b: &Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        _ => Ordering::Equal,
    }
}

/// Y-axis range policy for a series.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AxisDomain {
    Fixed { min: f64, max: f64 },
    /// Data range widened by `padding` on both sides
    Padded { padding: f64 },
}

/// Everything the UI needs to draw one environmental chart.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartSeries {
    pub kind: ReadingKind,
    /// RGB line color
    pub color: [u8; 3],
    pub domain: AxisDomain,
}

pub const CURRENT_POINT_COLOR: [u8; 3] = [0x3b, 0x82, 0xf6];
pub const CURRENT_POINT_RADIUS: f32 = 6.;
pub const POINT_RADIUS: f32 = 4.;

impl ChartSeries {
    pub const ALL: [ChartSeries; 4] = [
        ChartSeries {
            kind: ReadingKind::Temperature,
            color: [0xef, 0x44, 0x44],
            domain: AxisDomain::Padded { padding: 5. },
        },
        ChartSeries {
            kind: ReadingKind::Humidity,
            color: [0x3b, 0x82, 0xf6],
            domain: AxisDomain::Fixed { min: 0., max: 100. },
        },
        ChartSeries {
            kind: ReadingKind::Light,
            color: [0xea, 0xb3, 0x08],
            domain: AxisDomain::Padded { padding: 100. },
        },
        ChartSeries {
            kind: ReadingKind::Battery,
            color: [0x22, 0xc5, 0x5e],
            domain: AxisDomain::Fixed { min: 0., max: 100. },
        },
    ];

    /// `(x, y)` pairs for the recorded values; x is the index in `points`.
    /// Missing values are skipped so the line bridges the gap.
    pub fn samples(&self, points: &[ChartPoint]) -> Vec<[f64; 2]> {
        points
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.value(self.kind).map(|v| [i as f64, f64::from(v)]))
            .collect()
    }

    /// Y range to show, or `None` when the series has no recorded values and
    /// a padded domain.
    pub fn y_range(&self, points: &[ChartPoint]) -> Option<(f64, f64)> {
        match self.domain {
            AxisDomain::Fixed { min, max } => Some((min, max)),
            AxisDomain::Padded { padding } => {
                let values = points.iter().filter_map(|p| p.value(self.kind));
                let (min, max) = values.fold(None, |acc: Option<(f32, f32)>, v| match acc {
                    Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
                    None => Some((v, v)),
                })?;
                Some((f64::from(min) - padding, f64::from(max) + padding))
            }
        }
    }

    /// `"<value><unit>"`, the tooltip body for one sample.
    pub fn tooltip(&self, value: f64) -> String {
        format!("{}{}", value, self.kind.unit())
    }
}
