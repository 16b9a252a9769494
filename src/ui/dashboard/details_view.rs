use egui::{Align, Grid, Layout, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use cargotrace::{
    chart::ChartSeries,
    shipment::{ReadingKind, Shipment},
};

use crate::ui::{PALETTE_MUTED, PALETTE_TEXT, card, rgb};

use super::DashboardApp;

const TABLE_ROW_HEIGHT: f32 = 20.;

fn info_cell(ui: &mut Ui, label: &str, value: &str) {
    ui.vertical(|ui| {
        ui.label(RichText::new(label).small().color(PALETTE_MUTED));
        ui.label(RichText::new(value).strong().color(PALETTE_TEXT));
    });
}

fn reading_color(kind: ReadingKind) -> egui::Color32 {
    ChartSeries::ALL
        .iter()
        .find(|series| series.kind == kind)
        .map(|series| rgb(series.color))
        .unwrap_or(PALETTE_MUTED)
}

impl DashboardApp {
    pub(crate) fn details_view(&mut self, ui: &mut Ui) {
        card(ui, "📦 Shipment Details", |ui| {
            let Some(shipment) = self.selected_shipment() else {
                ui.label(RichText::new("Select a shipment to view details").color(PALETTE_MUTED));
                return;
            };

            Grid::new("shipment_info")
                .num_columns(2)
                .spacing([40., 10.])
                .show(ui, |ui| {
                    info_cell(ui, "Shipment ID", &shipment.id);
                    info_cell(ui, "Carrier", &shipment.carrier);
                    ui.end_row();
                    info_cell(ui, "Origin", &shipment.origin);
                    info_cell(ui, "Destination", &shipment.destination);
                    ui.end_row();
                    info_cell(ui, "Estimated Delivery", &shipment.estimated_delivery);
                    info_cell(ui, "Last Update", &shipment.last_update);
                    ui.end_row();
                });

            if let Some(reading) = shipment
                .current_checkpoint()
                .and_then(|checkpoint| checkpoint.env_data.as_ref())
            {
                ui.separator();
                ui.label(RichText::new("Current Environmental Data").strong());
                Grid::new("current_env_data")
                    .num_columns(2)
                    .spacing([40., 8.])
                    .show(ui, |ui| {
                        for (i, kind) in ReadingKind::ALL.iter().enumerate() {
                            ui.vertical(|ui| {
                                ui.label(RichText::new(kind.label()).small().color(reading_color(*kind)));
                                ui.label(RichText::new(kind.format(kind.value(reading))).strong());
                            });
                            if i % 2 == 1 {
                                ui.end_row();
                            }
                        }
                    });
            }

            ui.separator();
            ui.label(RichText::new("Checkpoints").strong());
            checkpoint_table(ui, shipment);
        });
    }
}

fn checkpoint_table(ui: &mut Ui, shipment: &Shipment) {
    TableBuilder::new(ui)
        .id_salt("checkpoints")
        .striped(true)
        .cell_layout(Layout::left_to_right(Align::Center))
        .column(Column::auto().at_least(150.))
        .column(Column::auto().at_least(130.))
        .column(Column::auto().at_least(110.))
        .columns(Column::auto().at_least(70.), ReadingKind::ALL.len())
        .header(TABLE_ROW_HEIGHT, |mut header| {
            for title in ["Time", "Location", "Status"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
            for kind in ReadingKind::ALL {
                header.col(|ui| {
                    ui.strong(kind.label());
                });
            }
        })
        .body(|mut body| {
            for checkpoint in &shipment.checkpoints {
                body.row(TABLE_ROW_HEIGHT, |mut row| {
                    let text = |value: &str| {
                        let text = RichText::new(value);
                        if shipment.is_current(checkpoint) {
                            text.strong()
                        } else if checkpoint.completed {
                            text
                        } else {
                            text.color(PALETTE_MUTED)
                        }
                    };
                    row.col(|ui| {
                        ui.label(text(&checkpoint.time));
                    });
                    row.col(|ui| {
                        ui.label(text(&checkpoint.location));
                    });
                    row.col(|ui| {
                        ui.label(text(&checkpoint.status));
                    });
                    for kind in ReadingKind::ALL {
                        let value = checkpoint.env_data.as_ref().and_then(|r| kind.value(r));
                        row.col(|ui| {
                            ui.label(text(&kind.format(value)));
                        });
                    }
                });
            }
        });
}
