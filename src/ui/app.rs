use std::time::{Duration, Instant};

use eframe::egui;
use tokio::sync::mpsc;

use crate::common::{ChatCommand, ChatEntry, ChatEvent};

use super::components::{attachment_bar, input_bar, notices, session_bar, transcript};
use super::render::Renderer;
use super::state::AppState;

/// Channels to the chat controller running on the network task.
pub struct SessionLink {
    pub command_sender: mpsc::Sender<ChatCommand>,
    pub event_receiver: mpsc::Receiver<ChatEvent>,
}

pub struct ChatApp {
    state: AppState,
    renderer: Option<Renderer>,
    link: Option<SessionLink>,
}

impl ChatApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        renderer: Renderer,
        link: SessionLink,
        history: &[ChatEntry],
    ) -> Self {
        install_media_loaders(&cc.egui_ctx);
        let mut state = AppState::new();
        state.push_history(&renderer, history);
        Self {
            state,
            renderer: Some(renderer),
            link: Some(link),
        }
    }

    /// No session id was provided: nothing to wire up.
    pub fn inactive(_cc: &eframe::CreationContext<'_>) -> Self {
        Self {
            state: AppState::new(),
            renderer: None,
            link: None,
        }
    }

    fn handle_chat_events(&mut self, now: Instant) {
        let (Some(link), Some(renderer)) = (self.link.as_mut(), self.renderer.as_ref()) else {
            return;
        };
        while let Ok(event) = link.event_receiver.try_recv() {
            self.state.apply(event, renderer, now);
        }
    }

    fn send_command(&self, command: ChatCommand) {
        let Some(link) = &self.link else {
            return;
        };
        if let Err(err) = link.command_sender.try_send(command) {
            log::warn!("Failed to send command to chat controller: {err}");
        }
    }
}

/// Lets image bodies load their thumbnails straight from the dashboard.
pub fn install_media_loaders(ctx: &egui::Context) {
    egui_extras::install_image_loaders(ctx);
}

impl eframe::App for ChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.handle_chat_events(now);
        self.state.prune_notices(now);

        let Some(renderer) = &self.renderer else {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.heading("Teleconsultation chat");
                ui.label("No active consultation.");
            });
            return;
        };

        let actions = egui::TopBottomPanel::top("session_bar")
            .show(ctx, |ui| {
                let actions = session_bar::render(ui, renderer.session(), &self.state);
                notices::render(ui, &self.state);
                actions
            })
            .inner;

        let (outgoing, attachment) = egui::TopBottomPanel::bottom("composer")
            .show(ctx, |ui| {
                let attachment = attachment_bar::render(ui, &self.state);
                ui.separator();
                let outgoing = input_bar::render(ui, &mut self.state);
                (outgoing, attachment)
            })
            .inner;

        egui::CentralPanel::default().show(ctx, |ui| {
            transcript::render(ui, &mut self.state);
        });

        notices::render_alert(ctx, &mut self.state);

        if actions.start_call {
            self.send_command(ChatCommand::StartVideoCall);
        }
        if actions.close_session {
            self.send_command(ChatCommand::CloseSession);
        }
        if let Some((kind, path)) = attachment {
            self.send_command(ChatCommand::AttachmentSelected { kind, path });
        }
        if let Some(body) = outgoing {
            self.send_command(ChatCommand::SendMessage(body));
        }

        ctx.request_repaint_after(Duration::from_millis(100));
    }
}
