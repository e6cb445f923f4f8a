use eframe::egui;

use auto_market_dashboard::data::DataContext;

use crate::state::AppState;
use crate::ui::{pages, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub enum DashboardApp {
    Ready(Box<AppState>),
    /// Startup load failed; nothing but the error is shown.
    Unavailable { message: String },
}

impl DashboardApp {
    pub fn ready(context: DataContext) -> Self {
        DashboardApp::Ready(Box::new(AppState::new(context)))
    }

    pub fn unavailable(message: String) -> Self {
        DashboardApp::Unavailable { message }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let state = match self {
            DashboardApp::Ready(state) => state,
            DashboardApp::Unavailable { message } => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    panels::unavailable_notice(ui, message);
                });
                return;
            }
        };

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, state);
        });

        // ---- Left side panel: navigation ----
        egui::SidePanel::left("navigation_panel")
            .default_width(200.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, state);
            });

        // ---- Central panel: selected page ----
        egui::CentralPanel::default().show(ctx, |ui| {
            pages::show(ui, state);
        });
    }
}
