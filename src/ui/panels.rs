use eframe::egui::{self, Color32, RichText, Ui};

use auto_market_dashboard::dashboard::Page;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – navigation
// ---------------------------------------------------------------------------

/// Render the navigation sidebar.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Navigation");
    ui.separator();

    ui.strong("Go to");
    for page in Page::ALL {
        if ui.radio_value(&mut state.page, page, page.title()).changed() {
            log::debug!("navigated to {page}");
        }
    }

    ui.add_space(12.0);
    ui.separator();
    ui.strong("Data set");
    ui.label(format!("{} brands", state.overview.brand_count));
    ui.label(format!("{} segments", state.segment_choices.len()));
    ui.label(format!("{} used-car models", state.used_model_count()));
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / status bar.
pub fn top_bar(ui: &mut Ui, state: &AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Quit").clicked() {
                ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
                ui.close_menu();
            }
        });

        ui.separator();

        let sizes: Vec<String> = state
            .table_sizes()
            .iter()
            .map(|(name, n)| format!("{n} {name}"))
            .collect();
        ui.label(sizes.join(" · "));
    });
}

// ---------------------------------------------------------------------------
// Fatal load error
// ---------------------------------------------------------------------------

/// The only thing shown when the data could not be loaded.
pub fn unavailable_notice(ui: &mut Ui, message: &str) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.label(RichText::new(message).color(Color32::RED).size(16.0));
    });
}
