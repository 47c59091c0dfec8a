use eframe::egui;

use crate::ui::state::AppState;

/// Returns the text to submit. The input is only cleared once the server
/// accepted the message.
pub fn render(ui: &mut egui::Ui, state: &mut AppState) -> Option<String> {
    let mut send = false;
    ui.horizontal(|ui| {
        let response = ui.add_enabled(
            !state.session_closed,
            egui::TextEdit::multiline(&mut state.input_text)
                .desired_rows(2)
                .hint_text("Write a message (Ctrl+Enter to send)"),
        );
        if state.focus_input {
            response.request_focus();
            state.focus_input = false;
        }

        if ui
            .add_enabled(state.can_send(), egui::Button::new("Send"))
            .clicked()
        {
            send = true;
        }

        if response.has_focus()
            && ui.input(|i| i.key_pressed(egui::Key::Enter) && i.modifiers.command)
        {
            send = true;
        }
    });

    if send && state.can_send() && !state.input_text.trim().is_empty() {
        return Some(state.input_text.clone());
    }

    None
}
