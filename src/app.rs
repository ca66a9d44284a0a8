use eframe::egui;

use crate::state::AppState;
use crate::ui::{chart, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct BaselineChartApp {
    pub state: AppState,
}

impl BaselineChartApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for BaselineChartApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: baseline and countries ----
        egui::SidePanel::left("country_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: chart and slider ----
        egui::CentralPanel::default().show(ctx, |ui| {
            chart::chart_view(ui, &mut self.state);
        });
    }
}
