use egui::{CollapsingHeader, CornerRadius, Frame, Margin, ProgressBar, RichText, Sense, Stroke, Ui};

use crate::ui::{PALETTE_ACCENT, PALETTE_CARD, PALETTE_MUTED, PALETTE_SELECTED, PALETTE_TEXT, card, status_badge};

use super::DashboardApp;

impl DashboardApp {
    pub(crate) fn shipment_list(&mut self, ui: &mut Ui) {
        let mut clicked = None;

        card(ui, "🚚 Active Shipments", |ui| {
            for (index, shipment) in self.source.active_shipments().iter().enumerate() {
                let is_selected = self.selected == Some(index);
                let response = Frame::new()
                    .fill(if is_selected { PALETTE_SELECTED } else { PALETTE_CARD })
                    .stroke(if is_selected {
                        Stroke::new(1.5, PALETTE_ACCENT)
                    } else {
                        Stroke::new(1., PALETTE_MUTED.gamma_multiply(0.3))
                    })
                    .corner_radius(CornerRadius::same(6))
                    .inner_margin(Margin::same(8))
                    .show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        ui.horizontal(|ui| {
                            ui.label(RichText::new(&shipment.id).strong().color(PALETTE_TEXT));
                            status_badge(ui, shipment.status);
                        });
                        ui.label(
                            RichText::new(format!("Updated {}", shipment.last_update))
                                .small()
                                .color(PALETTE_MUTED),
                        );
                        ui.label(format!("{}  to  {}", shipment.origin, shipment.destination));
                        ui.horizontal(|ui| {
                            ui.label(RichText::new("Progress").small().color(PALETTE_MUTED));
                            ui.label(RichText::new(format!("{}%", shipment.progress)).small().strong());
                        });
                        ui.add(
                            ProgressBar::new(shipment.progress_fraction())
                                .desired_height(6.)
                                .fill(PALETTE_ACCENT),
                        );
                        ui.label(
                            RichText::new(format!("Est. Delivery: {}", shipment.estimated_delivery))
                                .small()
                                .color(PALETTE_MUTED),
                        );
                    })
                    .response
                    .interact(Sense::click());
                if response.clicked() {
                    clicked = Some(index);
                }
                ui.add_space(6.);
            }
            if self.source.active_shipments().is_empty() {
                ui.label(RichText::new("No active shipments").color(PALETTE_MUTED));
            }
        });

        if let Some(index) = clicked {
            let ctx = ui.ctx().clone();
            self.select(index, &ctx);
        }
    }

    pub(crate) fn past_shipments(&mut self, ui: &mut Ui) {
        let shipments = self.source.past_shipments();
        let response = Frame::new()
            .fill(PALETTE_CARD)
            .corner_radius(CornerRadius::same(8))
            .inner_margin(Margin::same(12))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                CollapsingHeader::new(RichText::new("Past Shipments").strong().color(PALETTE_TEXT))
                    .open(Some(self.show_past_shipments))
                    .show(ui, |ui| {
                        for shipment in shipments {
                            ui.horizontal(|ui| {
                                ui.label(RichText::new(&shipment.id).strong());
                                status_badge(ui, shipment.status);
                            });
                            ui.label(
                                RichText::new(format!("{}  to  {}", shipment.origin, shipment.destination))
                                    .small(),
                            );
                            ui.label(
                                RichText::new(format!(
                                    "Delivered: {} • {}",
                                    shipment.delivery_date, shipment.carrier
                                ))
                                .small()
                                .color(PALETTE_MUTED),
                            );
                            ui.separator();
                        }
                    })
            })
            .inner;
        if response.header_response.clicked() {
            self.show_past_shipments = !self.show_past_shipments;
        }
    }
}
