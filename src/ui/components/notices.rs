use eframe::egui;

use crate::ui::state::AppState;

pub fn render(ui: &mut egui::Ui, state: &AppState) {
    for notice in &state.notices {
        ui.colored_label(egui::Color32::LIGHT_BLUE, notice.text.as_str());
    }
}

/// Blocking error dialog; stays until acknowledged.
pub fn render_alert(ctx: &egui::Context, state: &mut AppState) {
    let Some(text) = state.alert.clone() else {
        return;
    };

    let mut acknowledged = false;
    let response = egui::Modal::new(egui::Id::new("chat_alert")).show(ctx, |ui| {
        ui.heading("Error");
        ui.label(text);
        if ui.button("OK").clicked() {
            acknowledged = true;
        }
    });

    if acknowledged || response.should_close() {
        state.alert = None;
    }
}
