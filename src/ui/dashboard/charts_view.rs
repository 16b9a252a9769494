use std::ops::RangeInclusive;

use egui::{RichText, Ui, Vec2b};
use egui_plot::{GridMark, Line, Plot, PlotPoints, Points};

use cargotrace::chart::{
    CURRENT_POINT_COLOR, CURRENT_POINT_RADIUS, ChartPoint, ChartSeries, POINT_RADIUS,
    prepare_chart_data,
};

use crate::ui::{PALETTE_MUTED, card, rgb};

use super::DashboardApp;

const CHART_HEIGHT: f32 = 180.;

fn x_label(points: &[ChartPoint], mark: &GridMark) -> String {
    let index = mark.value.round();
    if (mark.value - index).abs() > f64::EPSILON || index < 0. {
        return String::new();
    }
    points
        .get(index as usize)
        .map(|p| p.name.clone())
        .unwrap_or_default()
}

fn show_chart(ui: &mut Ui, series: &ChartSeries, points: &[ChartPoint]) {
    let color = rgb(series.color);
    ui.label(RichText::new(series.kind.label()).strong().color(color));

    let samples = series.samples(points);
    let current: Vec<[f64; 2]> = samples
        .iter()
        .filter(|[x, _]| points.get(*x as usize).is_some_and(|p| p.is_current))
        .copied()
        .collect();

    let mut plot = Plot::new(("environment", series.kind.label()))
        .height(CHART_HEIGHT)
        .show_background(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .auto_bounds(Vec2b::new(true, false))
        .x_axis_formatter({
            let points = points.to_vec();
            move |mark: GridMark, _range: &RangeInclusive<f64>| x_label(&points, &mark)
        });
    if let Some((min, max)) = series.y_range(points) {
        plot = plot.include_y(min).include_y(max);
    }

    let response = plot.show(ui, |plot_ui| {
        plot_ui.line(
            Line::new(series.kind.label(), PlotPoints::new(samples.clone()))
                .color(color)
                .width(2.),
        );
        plot_ui.points(
            Points::new(series.kind.label(), PlotPoints::new(samples.clone()))
                .color(color)
                .radius(POINT_RADIUS)
                .filled(true),
        );
        plot_ui.points(
            Points::new("Current", PlotPoints::new(current))
                .color(rgb(CURRENT_POINT_COLOR))
                .radius(CURRENT_POINT_RADIUS)
                .filled(true),
        );
        plot_ui.pointer_coordinate()
    });

    // tooltip for the sample under the pointer
    if let Some(pointer) = response.inner {
        let index = pointer.x.round();
        if index >= 0.
            && let Some(point) = points.get(index as usize)
        {
            response.response.on_hover_ui(|ui| {
                ui.label(RichText::new(point.heading()).strong());
                let value = point
                    .value(series.kind)
                    .map(|v| series.tooltip(f64::from(v)))
                    .unwrap_or_else(|| series.kind.format(None));
                ui.label(format!("{}: {}", series.kind.label(), value));
                ui.label(RichText::new(&point.status).small().color(PALETTE_MUTED));
            });
        }
    }
}

impl DashboardApp {
    pub(crate) fn charts_view(&mut self, ui: &mut Ui) {
        card(ui, "📈 Environmental Conditions", |ui| {
            let Some(shipment) = self.selected_shipment() else {
                return;
            };
            let points = prepare_chart_data(shipment);
            if points.is_empty() {
                ui.label(
                    RichText::new("No environmental data available for this shipment")
                        .color(PALETTE_MUTED),
                );
                return;
            }

            ui.columns(2, |columns| {
                for (i, series) in ChartSeries::ALL.iter().enumerate() {
                    show_chart(&mut columns[i % 2], series, &points);
                }
            });
            ui.label(
                RichText::new("● current checkpoint")
                    .small()
                    .color(rgb(CURRENT_POINT_COLOR)),
            );
        });
    }
}
