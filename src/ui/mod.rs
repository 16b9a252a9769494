use egui::{Color32, CornerRadius, Frame, Margin, RichText, Ui};

use cargotrace::ShipmentStatus;

pub(crate) mod dashboard;

pub(crate) const PALETTE_BACKGROUND: Color32 = Color32::from_rgb(243, 244, 246);
pub(crate) const PALETTE_CARD: Color32 = Color32::WHITE;
pub(crate) const PALETTE_TEXT: Color32 = Color32::from_rgb(31, 41, 55);
pub(crate) const PALETTE_MUTED: Color32 = Color32::from_rgb(107, 114, 128);
pub(crate) const PALETTE_ACCENT: Color32 = Color32::from_rgb(20, 184, 166);
pub(crate) const PALETTE_SELECTED: Color32 = Color32::from_rgb(239, 246, 255);

const CARD_CORNER_RADIUS: u8 = 8;
const BADGE_CORNER_RADIUS: u8 = 10;

pub(crate) fn rgb(color: [u8; 3]) -> Color32 {
    Color32::from_rgb(color[0], color[1], color[2])
}

pub(crate) fn status_color(status: ShipmentStatus) -> Color32 {
    match status {
        ShipmentStatus::PickedUp => Color32::from_rgb(59, 130, 246),
        ShipmentStatus::InTransit => Color32::from_rgb(234, 179, 8),
        ShipmentStatus::OutForDelivery => Color32::from_rgb(168, 85, 247),
        ShipmentStatus::Delivered => Color32::from_rgb(34, 197, 94),
    }
}

pub(crate) fn status_badge(ui: &mut Ui, status: ShipmentStatus) {
    Frame::new()
        .fill(status_color(status))
        .corner_radius(CornerRadius::same(BADGE_CORNER_RADIUS))
        .inner_margin(Margin::symmetric(8, 2))
        .show(ui, |ui| {
            ui.label(RichText::new(status.label()).color(Color32::WHITE).small().strong());
        });
}

/// White rounded panel with a title row.
pub(crate) fn card<R>(ui: &mut Ui, title: &str, add_contents: impl FnOnce(&mut Ui) -> R) -> R {
    Frame::new()
        .fill(PALETTE_CARD)
        .corner_radius(CornerRadius::same(CARD_CORNER_RADIUS))
        .inner_margin(Margin::same(12))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(RichText::new(title).color(PALETTE_TEXT).strong().size(16.));
            ui.add_space(6.);
            add_contents(ui)
        })
        .inner
}
