mod charts_view;
mod details_view;
pub(crate) mod map_view;
mod shipment_list;

use std::sync::mpsc::{self, Receiver, Sender};

use cargotrace::{
    AppConfig, MapController, RoutePath, RouteResolver, RouteTag, Shipment, ShipmentSource,
};
use egui::{Frame, Margin, Visuals};
use log::{debug, info, warn};
use tokio::runtime::Runtime;

use super::{PALETTE_ACCENT, PALETTE_BACKGROUND, PALETTE_CARD, PALETTE_SELECTED};
use map_view::PlotMapCanvas;

const SIDE_PANEL_WIDTH: f32 = 340.;

type RouteResult = (RouteTag, RoutePath);

pub(crate) struct DashboardApp {
    source: Box<dyn ShipmentSource>,
    selected: Option<usize>,
    show_past_shipments: bool,
    resolver: RouteResolver,
    runtime: Runtime,
    route_tx: Sender<RouteResult>,
    route_rx: Receiver<RouteResult>,
    map: MapController<PlotMapCanvas, fn() -> PlotMapCanvas>,
    /// Route request in flight for the current selection
    pending_route: Option<RouteTag>,
}

impl DashboardApp {
    pub(crate) fn new(
        source: Box<dyn ShipmentSource>,
        resolver: RouteResolver,
        runtime: Runtime,
        config: &AppConfig,
        initial_selection: usize,
        cc: &eframe::CreationContext<'_>,
    ) -> Self {
        let visuals = Visuals {
            dark_mode: false,
            panel_fill: PALETTE_BACKGROUND,
            window_fill: PALETTE_CARD,
            hyperlink_color: PALETTE_ACCENT,
            faint_bg_color: PALETTE_SELECTED,
            striped: true,
            ..Visuals::light()
        };
        cc.egui_ctx.set_visuals(visuals);

        let (route_tx, route_rx) = mpsc::channel();
        let mut app = Self {
            source,
            selected: None,
            show_past_shipments: config.show_past_shipments,
            resolver,
            runtime,
            route_tx,
            route_rx,
            map: MapController::new(PlotMapCanvas::default as fn() -> PlotMapCanvas),
            pending_route: None,
        };
        app.select(initial_selection, &cc.egui_ctx);
        app
    }

    pub(crate) fn selected_shipment(&self) -> Option<&Shipment> {
        self.selected
            .and_then(|index| self.source.active_shipments().get(index))
    }

    /// Switches the dashboard to another active shipment and starts
    /// resolving its route in the background.
    pub(crate) fn select(&mut self, index: usize, ctx: &egui::Context) {
        let Some(shipment) = self.source.active_shipments().get(index) else {
            warn!("No active shipment at position {}", index);
            self.selected = None;
            self.pending_route = None;
            self.map.clear();
            return;
        };
        if self.selected == Some(index) {
            return;
        }
        info!("Selected shipment {}", shipment.id);

        self.selected = Some(index);
        let request = self.map.select(shipment);
        self.pending_route = Some(request.tag.clone());

        let resolver = self.resolver.clone();
        let route_tx = self.route_tx.clone();
        let ctx = ctx.clone();
        self.runtime.spawn(async move {
            let path = resolver
                .resolve(&request.checkpoints, &request.transport_type)
                .await;
            if route_tx.send((request.tag, path)).is_err() {
                debug!("Dashboard closed before the route arrived");
            }
            ctx.request_repaint();
        });
    }

    fn receive_routes(&mut self) {
        while let Ok((tag, path)) = self.route_rx.try_recv() {
            if self.map.apply_route(&tag, &path) {
                debug!(
                    "Drew {} route for {} ({} points)",
                    if path.is_snapped() { "snapped" } else { "straight" },
                    tag.shipment_id,
                    path.len()
                );
                self.pending_route = None;
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.receive_routes();

        egui::SidePanel::left("shipments")
            .resizable(false)
            .exact_width(SIDE_PANEL_WIDTH)
            .frame(Frame::new().fill(PALETTE_BACKGROUND).inner_margin(Margin::same(10)))
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .id_salt("shipment_lists")
                    .show(ui, |ui| {
                        self.shipment_list(ui);
                        ui.add_space(10.);
                        self.past_shipments(ui);
                    });
            });

        egui::CentralPanel::default()
            .frame(Frame::new().fill(PALETTE_BACKGROUND).inner_margin(Margin::same(10)))
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .id_salt("shipment_detail")
                    .show(ui, |ui| {
                        self.map_view(ui);
                        ui.add_space(10.);
                        self.details_view(ui);
                        ui.add_space(10.);
                        self.charts_view(ui);
                    });
            });
    }
}
