use std::sync::Arc;

use eframe::egui::{self, ScrollArea, Ui};

use crate::data::model::ShowTable;
use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct TvShowApp {
    pub state: AppState,
}

impl TvShowApp {
    pub fn new(table: Arc<ShowTable>) -> Self {
        Self {
            state: AppState::new(table),
        }
    }
}

impl eframe::App for TvShowApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: title and counts ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: metrics and charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(dashboard) = &self.state.dashboard else {
                ui.centered_and_justified(|ui: &mut Ui| {
                    ui.heading("Nothing to show.");
                });
                return;
            };

            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    panels::metrics(ui, dashboard);
                    ui.separator();
                    panels::raw_data(ui, dashboard);
                    ui.separator();
                    for (i, chart) in dashboard.charts.iter().enumerate() {
                        plot::chart(ui, &format!("chart_{i}"), chart);
                        ui.add_space(12.0);
                    }
                });
        });
    }
}
