use egui::{Align, Layout, RichText, Ui};
use egui_plot::{Line, LineStyle, MarkerShape, Plot, PlotPoint, PlotPoints, Points};
use log::debug;

use cargotrace::{
    Coordinate,
    map::{ATTRIBUTION, MapCanvas, Marker, MarkerState, Popup, RouteStyle},
};

use crate::ui::{PALETTE_MUTED, card, rgb, status_badge};

use super::DashboardApp;

const MAP_HEIGHT: f32 = 420.;
const MARKER_RADIUS: f32 = 7.;
/// Click distance, in degrees, within which a marker counts as hit
const PICK_DISTANCE: f64 = 0.5;

/// Map canvas drawn with a lon/lat plot.
#[derive(Default)]
pub(crate) struct PlotMapCanvas {
    markers: Vec<Marker>,
    route: Option<(Vec<Coordinate>, RouteStyle)>,
    open_popup: Option<usize>,
}

impl MapCanvas for PlotMapCanvas {
    fn add_marker(&mut self, marker: Marker) {
        self.markers.push(marker);
    }

    fn draw_route(&mut self, points: Vec<Coordinate>, style: RouteStyle) {
        self.route = Some((points, style));
    }

    fn release(&mut self) {
        debug!("Dropping {} map markers", self.markers.len());
        self.markers.clear();
        self.route = None;
        self.open_popup = None;
    }
}

impl PlotMapCanvas {
    fn nearest_marker(&self, at: PlotPoint) -> Option<usize> {
        self.markers
            .iter()
            .enumerate()
            .map(|(i, m)| (i, (m.position.lon - at.x).hypot(m.position.lat - at.y)))
            .filter(|(_, distance)| *distance <= PICK_DISTANCE)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }

    fn show(&mut self, ui: &mut Ui) {
        let plot = Plot::new("shipment_map")
            .height(MAP_HEIGHT)
            .data_aspect(1.)
            .show_axes([false, false])
            .show_grid(false)
            .allow_double_click_reset(true);

        let response = plot.show(ui, |plot_ui| {
            if let Some((points, style)) = &self.route {
                let line = Line::new(
                    "Route",
                    PlotPoints::new(points.iter().map(|c| [c.lon, c.lat]).collect()),
                )
                .color(rgb(style.color).gamma_multiply(style.opacity))
                .width(style.width);
                plot_ui.line(if style.dashed {
                    line.style(LineStyle::dashed_loose())
                } else {
                    line
                });
            }

            for state in [MarkerState::Future, MarkerState::Completed, MarkerState::Current] {
                let positions: Vec<[f64; 2]> = self
                    .markers
                    .iter()
                    .filter(|m| m.state == state)
                    .map(|m| [m.position.lon, m.position.lat])
                    .collect();
                plot_ui.points(
                    Points::new(format!("{:?}", state), PlotPoints::new(positions))
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(MARKER_RADIUS)
                        .color(rgb(state.color())),
                );
            }
        });

        if response.response.clicked()
            && let Some(pointer) = response.response.interact_pointer_pos()
        {
            let at = response.transform.value_from_position(pointer);
            self.open_popup = self.nearest_marker(at);
        }

        if let Some(popup) = self.open_popup.and_then(|i| self.markers.get(i)).map(|m| &m.popup) {
            show_popup(ui, popup);
        }
    }
}

fn show_popup(ui: &mut Ui, popup: &Popup) {
    egui::Frame::popup(ui.style()).show(ui, |ui| {
        ui.label(RichText::new(&popup.title).strong());
        ui.label(RichText::new(&popup.status).strong());
        ui.label(RichText::new(&popup.time).small().color(PALETTE_MUTED));
        if !popup.readings.is_empty() {
            ui.separator();
            egui::Grid::new("popup_readings").num_columns(2).show(ui, |ui| {
                for (label, value) in &popup.readings {
                    ui.label(format!("{}:", label));
                    ui.label(RichText::new(value).strong());
                    ui.end_row();
                }
            });
        }
    });
}

impl DashboardApp {
    pub(crate) fn map_view(&mut self, ui: &mut Ui) {
        let status = self.selected_shipment().map(|s| s.status);
        let pending = self.pending_route.is_some();

        card(ui, "🗺 Shipment Route Map", |ui| {
            ui.horizontal(|ui| {
                if let Some(status) = status {
                    status_badge(ui, status);
                }
                if pending {
                    ui.spinner();
                    ui.label(RichText::new("Resolving route…").small().color(PALETTE_MUTED));
                }
            });

            match self.map.session_mut() {
                Some(session) => session.canvas_mut().show(ui),
                None => {
                    ui.label(RichText::new("Select a shipment to view route map").color(PALETTE_MUTED));
                }
            }

            ui.with_layout(Layout::right_to_left(Align::Min), |ui| {
                ui.label(RichText::new(ATTRIBUTION).small().color(PALETTE_MUTED));
            });
        });
    }
}
