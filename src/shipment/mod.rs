// Shipment data model shared by the chart preparer, the route resolver and the UI

pub mod fixtures;

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub use fixtures::{FixtureSource, ShipmentCatalog, ShipmentSource};

/// Delivery state of a shipment as shown on its badge.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ShipmentStatus {
    #[serde(rename = "Picked Up")]
    PickedUp,
    #[serde(rename = "In Transit")]
    InTransit,
    #[serde(rename = "Out for Delivery")]
    OutForDelivery,
    Delivered,
}

impl ShipmentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::PickedUp => "Picked Up",
            Self::InTransit => "In Transit",
            Self::OutForDelivery => "Out for Delivery",
            Self::Delivered => "Delivered",
        }
    }
}

impl fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Freight mode label carried by the shipment record.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum FreightMode {
    Air,
    Land,
    Sea,
    #[serde(other)]
    Other,
}

/// A geographic position in decimal degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Reads a raw `[lat, lon]` pair as delivered by the data feed.
    ///
    /// Returns `None` unless the slice has exactly two finite elements inside
    /// the valid latitude/longitude ranges.
    pub fn from_raw(raw: &[f64]) -> Option<Self> {
        match raw {
            [lat, lon]
                if lat.is_finite()
                    && lon.is_finite()
                    && (-90.0..=90.0).contains(lat)
                    && (-180.0..=180.0).contains(lon) =>
            {
                Some(Self::new(*lat, *lon))
            }
            _ => None,
        }
    }

    /// Reads a `[lon, lat]` pair, the order used by the directions service.
    pub fn from_lon_lat(pair: [f64; 2]) -> Self {
        Self::new(pair[1], pair[0])
    }

    pub fn to_lon_lat(self) -> [f64; 2] {
        [self.lon, self.lat]
    }
}

/// Sensor values recorded at a checkpoint. `None` means not recorded.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentalReading {
    /// Temperature in degrees Celsius
    pub temperature: Option<f32>,
    /// Relative humidity in percent
    pub humidity: Option<f32>,
    /// Light level in lux
    pub lux: Option<f32>,
    /// Tracker battery level in percent
    pub battery_life: Option<f32>,
}

/// The four environmental measurements tracked for every shipment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReadingKind {
    Temperature,
    Humidity,
    Light,
    Battery,
}

impl ReadingKind {
    pub const ALL: [ReadingKind; 4] = [
        ReadingKind::Temperature,
        ReadingKind::Humidity,
        ReadingKind::Light,
        ReadingKind::Battery,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Temperature => "Temperature",
            Self::Humidity => "Humidity",
            Self::Light => "Light Level",
            Self::Battery => "Battery Life",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Self::Temperature => "°C",
            Self::Humidity => "%",
            Self::Light => " lux",
            Self::Battery => "%",
        }
    }

    pub fn value(&self, reading: &EnvironmentalReading) -> Option<f32> {
        match self {
            Self::Temperature => reading.temperature,
            Self::Humidity => reading.humidity,
            Self::Light => reading.lux,
            Self::Battery => reading.battery_life,
        }
    }

    /// Formats a value with its unit, or `N/A` when it was not recorded.
    pub fn format(&self, value: Option<f32>) -> String {
        match value {
            Some(v) => format!("{}{}", v, self.unit()),
            None => "N/A".to_string(),
        }
    }
}

/// Reads a coordinate array from the feed.
///
/// A null, a non-array or an array holding anything but numbers becomes an
/// empty list, which [`Coordinate::from_raw`] then rejects.
fn lenient_coords<'de, D>(deserializer: D) -> Result<Vec<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let coords = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => items.iter().map(Value::as_f64).collect::<Option<Vec<_>>>(),
        _ => None,
    };
    Ok(coords.unwrap_or_default())
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Checkpoint {
    /// Free-form display timestamp, e.g. "Feb 28, 2025 - 08:30 AM"
    pub time: String,
    pub status: String,
    pub location: String,
    pub completed: bool,
    /// Raw `[lat, lon]` as delivered by the feed
    #[serde(default, deserialize_with = "lenient_coords")]
    pub coords: Vec<f64>,
    #[serde(default)]
    pub env_data: Option<EnvironmentalReading>,
}

impl Checkpoint {
    pub fn coordinate(&self) -> Option<Coordinate> {
        Coordinate::from_raw(&self.coords)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Shipment {
    pub id: String,
    pub origin: String,
    pub destination: String,
    pub status: ShipmentStatus,
    pub estimated_delivery: String,
    /// Delivery progress, 0 to 100
    pub progress: u8,
    pub carrier: String,
    pub mode: FreightMode,
    /// Transport hint handed to the route resolver ("truck", "plane", ...)
    pub transport_type: String,
    pub last_update: String,
    pub checkpoints: Vec<Checkpoint>,
    pub current_location: String,
    #[serde(default, deserialize_with = "lenient_coords")]
    pub current_coords: Vec<f64>,
}

impl Shipment {
    pub fn is_current(&self, checkpoint: &Checkpoint) -> bool {
        checkpoint.location == self.current_location
    }

    pub fn current_checkpoint(&self) -> Option<&Checkpoint> {
        self.checkpoints.iter().find(|cp| self.is_current(cp))
    }

    pub fn current_coordinate(&self) -> Option<Coordinate> {
        Coordinate::from_raw(&self.current_coords)
    }

    pub fn progress_fraction(&self) -> f32 {
        f32::from(self.progress.min(100)) / 100.
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PastShipment {
    pub id: String,
    pub origin: String,
    pub destination: String,
    pub status: ShipmentStatus,
    pub delivery_date: String,
    pub carrier: String,
}
