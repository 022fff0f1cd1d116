use eframe::egui;

use crate::config::Args;
use crate::state::AppState;
use crate::ui::{dashboard, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
}

impl DashboardApp {
    pub fn new(args: &Args) -> Self {
        Self {
            state: AppState::new(args.data_dir.clone(), args.logo_path()),
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: logo and title ----
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            panels::header(ui, &self.state);
        });

        // ---- Left side panel: navigation and data source ----
        egui::SidePanel::left("navigation")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: selected view ----
        egui::CentralPanel::default().show(ctx, |ui| {
            dashboard::central_panel(ui, &mut self.state);
        });
    }
}
