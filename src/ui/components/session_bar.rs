use eframe::egui;

use crate::common::{SessionId, TransportState};
use crate::ui::state::AppState;

#[derive(Default)]
pub struct SessionBarActions {
    pub start_call: bool,
    pub close_session: bool,
}

pub fn render(ui: &mut egui::Ui, session: &SessionId, state: &AppState) -> SessionBarActions {
    let mut actions = SessionBarActions::default();

    ui.horizontal(|ui| {
        ui.heading(format!("Consultation #{session}"));

        let color = match state.transport {
            TransportState::Open => egui::Color32::GREEN,
            TransportState::Connecting | TransportState::Reconnecting => egui::Color32::YELLOW,
            TransportState::Terminated => egui::Color32::GRAY,
        };
        ui.colored_label(color, "●");
        ui.label(egui::RichText::new(state.transport.label()).weak());

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let enabled = !state.session_closed;
            if ui
                .add_enabled(enabled, egui::Button::new("Close consultation"))
                .clicked()
            {
                actions.close_session = true;
            }
            if ui
                .add_enabled(enabled, egui::Button::new("Start video call"))
                .clicked()
            {
                actions.start_call = true;
            }
        });
    });

    actions
}
