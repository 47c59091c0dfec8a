use std::time::{Duration, Instant};

use crate::common::{ChatEntry, ChatEvent, TransportState};

use super::render::{RenderedEntry, Renderer};

/// Notices fade out after this long.
pub const NOTICE_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct Notice {
    pub text: String,
    pub expires_at: Instant,
}

/// Local UI state.
pub struct AppState {
    pub transcript: Vec<RenderedEntry>,
    pub input_text: String,
    pub send_enabled: bool,
    pub focus_input: bool,
    pub scroll_to_bottom: bool,
    pub transport: TransportState,
    pub notices: Vec<Notice>,
    pub alert: Option<String>,
    pub session_closed: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            transcript: Vec::new(),
            input_text: String::new(),
            send_enabled: true,
            focus_input: true,
            scroll_to_bottom: true,
            transport: TransportState::Connecting,
            notices: Vec::new(),
            alert: None,
            session_closed: false,
        }
    }

    /// Appends in arrival order and keeps the latest entry in view.
    pub fn push_entry(&mut self, entry: RenderedEntry) {
        self.transcript.push(entry);
        self.scroll_to_bottom = true;
    }

    pub fn push_history(&mut self, renderer: &Renderer, history: &[ChatEntry]) {
        for entry in history {
            self.transcript.push(renderer.render(entry));
        }
        self.scroll_to_bottom = true;
    }

    pub fn apply(&mut self, event: ChatEvent, renderer: &Renderer, now: Instant) {
        match event {
            ChatEvent::EntryAdded(entry) => self.push_entry(renderer.render(&entry)),
            ChatEvent::TransportChanged(state) => self.transport = state,
            ChatEvent::SendStarted => self.send_enabled = false,
            ChatEvent::SendFinished { accepted } => {
                self.send_enabled = true;
                if accepted {
                    self.input_text.clear();
                    self.focus_input = true;
                }
            }
            ChatEvent::Notice(text) => self.add_notice(text, now),
            ChatEvent::Alert(text) => self.alert = Some(text),
            ChatEvent::SessionClosed => {
                self.session_closed = true;
                self.send_enabled = false;
                self.add_notice("Consultation closed".to_string(), now);
            }
        }
    }

    pub fn add_notice(&mut self, text: String, now: Instant) {
        self.notices.push(Notice {
            text,
            expires_at: now + NOTICE_TTL,
        });
    }

    pub fn prune_notices(&mut self, now: Instant) {
        self.notices.retain(|notice| notice.expires_at > now);
    }

    pub fn can_send(&self) -> bool {
        self.send_enabled && !self.session_closed
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
