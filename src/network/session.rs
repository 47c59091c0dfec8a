//! Transport-agnostic state of one chat session.
//!
//! Every handler is a plain state transition; the async loop in
//! [`super::client`] performs the I/O the returned values ask for.

use std::time::Duration;

use chrono::Utc;

use crate::common::frame::{InboundFrame, parse_frame};
use crate::common::{ChatEntry, ChatMessage, Sender, SessionId, TransportState};

use super::submit::SubmitResponse;

pub const RECONNECT_DELAY: Duration = Duration::from_millis(3000);

pub struct ChatSession {
    session_id: Option<SessionId>,
    transport: TransportState,
    reconnect_delay: Duration,
    sending: bool,
}

impl ChatSession {
    pub fn new(session_id: SessionId) -> Self {
        Self {
            session_id: Some(session_id),
            transport: TransportState::Connecting,
            reconnect_delay: RECONNECT_DELAY,
            sending: false,
        }
    }

    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    pub fn session_id(&self) -> Option<&SessionId> {
        self.session_id.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.session_id.is_some()
    }

    pub fn transport_state(&self) -> TransportState {
        self.transport
    }

    pub fn is_sending(&self) -> bool {
        self.sending
    }

    /// Called when a connect attempt is about to start, including when a
    /// reconnect timer fires. Returns `false` for a stale timer.
    pub fn begin_connect(&mut self) -> bool {
        if self.session_id.is_none() {
            self.transport = TransportState::Terminated;
            return false;
        }
        self.transport = TransportState::Connecting;
        true
    }

    pub fn on_transport_opened(&mut self) {
        if self.is_active() {
            self.transport = TransportState::Open;
        }
    }

    /// Close, error or failed connect. Returns the delay before the next
    /// attempt, or `None` once the session is gone.
    pub fn on_transport_lost(&mut self) -> Option<Duration> {
        if self.session_id.is_none() {
            self.transport = TransportState::Terminated;
            return None;
        }
        self.transport = TransportState::Reconnecting;
        Some(self.reconnect_delay)
    }

    /// No live URL could be built: HTTP keeps working, live delivery never will.
    pub fn on_transport_unavailable(&mut self) {
        self.transport = TransportState::Terminated;
    }

    /// Decodes a text frame into a transcript entry. Frames are only honored
    /// while the transport is open.
    pub fn on_frame(&self, text: &str) -> Option<ChatEntry> {
        if self.transport != TransportState::Open {
            log::debug!("Dropping frame received while {}", self.transport.label());
            return None;
        }
        match parse_frame(text) {
            Ok(InboundFrame::Unknown(kind)) => {
                log::debug!("Ignoring frame of unknown type `{kind}`");
                None
            }
            Ok(frame) => frame.into_entry(),
            Err(err) => {
                log::warn!("{err}");
                None
            }
        }
    }

    /// Validates an outgoing body and marks a submission in flight.
    /// Returns the trimmed body to post, or `None` when nothing must be sent.
    pub fn prepare_submission(&mut self, body: &str) -> Option<String> {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            return None;
        }
        if self.session_id.is_none() {
            log::warn!("Session closed; message not sent");
            return None;
        }
        if self.sending {
            log::debug!("Submission already in flight");
            return None;
        }
        self.sending = true;
        Some(trimmed.to_string())
    }

    /// Handles the server answer. Returns the local echo to render, which is
    /// only produced when no live rebroadcast is expected.
    pub fn finish_submission(&mut self, body: String, response: &SubmitResponse) -> Option<ChatEntry> {
        self.sending = false;
        if !response.is_success() {
            log::warn!("Server refused message (status `{}`)", response.status);
            return None;
        }
        if self.transport == TransportState::Open {
            return None;
        }

        let id = response.message_id.clone().map(String::from).unwrap_or_else(|| {
            log::warn!("Accepted message carries no id");
            String::new()
        });
        Some(ChatEntry::Text(ChatMessage {
            id,
            content: body,
            sender: Sender::Me,
            timestamp: response.timestamp.unwrap_or_else(Utc::now),
        }))
    }

    pub fn abort_submission(&mut self) {
        self.sending = false;
    }

    /// Ends the session; the transport cycle stops for good.
    pub fn close(&mut self) {
        self.session_id = None;
        self.transport = TransportState::Terminated;
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::common::MediaKind;
    use crate::common::frame::WireId;

    fn session() -> ChatSession {
        ChatSession::new(SessionId::parse("abc123").unwrap())
    }

    fn open_session() -> ChatSession {
        let mut session = session();
        session.on_transport_opened();
        session
    }

    fn accepted(id: &str) -> SubmitResponse {
        SubmitResponse {
            status: "success".to_string(),
            message_id: Some(WireId::Text(id.to_string())),
            timestamp: Some(Utc.with_ymd_and_hms(2024, 1, 1, 10, 1, 0).unwrap()),
        }
    }

    #[test]
    fn starts_connecting_and_opens() {
        let mut session = session();
        assert_eq!(session.transport_state(), TransportState::Connecting);
        session.on_transport_opened();
        assert_eq!(session.transport_state(), TransportState::Open);
    }

    #[test]
    fn loss_schedules_fixed_delay_reconnect_forever() {
        let mut session = open_session();
        for _ in 0..5 {
            assert_eq!(session.on_transport_lost(), Some(Duration::from_millis(3000)));
            assert_eq!(session.transport_state(), TransportState::Reconnecting);
            assert!(session.begin_connect());
            assert_eq!(session.transport_state(), TransportState::Connecting);
        }
    }

    #[test]
    fn stale_timer_after_close_is_a_noop() {
        let mut session = open_session();
        assert!(session.on_transport_lost().is_some());
        session.close();
        assert!(!session.begin_connect());
        assert_eq!(session.transport_state(), TransportState::Terminated);
        assert_eq!(session.on_transport_lost(), None);
    }

    #[test]
    fn new_message_frame_yields_one_entry_when_open() {
        let session = open_session();
        let entry = session
            .on_frame(r#"{"type":"new_message","data":{"id":"7","content":"Bonjour\ndocteur","sender":"counterpart","timestamp":"2024-01-01T10:00:00Z","type":"text"}}"#)
            .unwrap();
        let ChatEntry::Text(message) = entry else {
            panic!("expected text entry");
        };
        assert_eq!(message.id, "7");
        assert_eq!(message.content, "Bonjour\ndocteur");
        assert_eq!(message.sender, Sender::Counterpart);
    }

    #[test]
    fn media_frame_keeps_media_fields() {
        let session = open_session();
        let entry = session
            .on_frame(r#"{"type":"new_media","data":{"id":"5","type":"image","url":"/m/5.png","mime_type":"image/png","sender":"counterpart","timestamp":"2024-01-01T10:00:00Z"}}"#)
            .unwrap();
        let ChatEntry::Media(media) = entry else {
            panic!("expected media entry");
        };
        assert_eq!(media.kind, MediaKind::Image);
        assert_eq!(media.url, "/m/5.png");
        assert_eq!(media.display_name, "5.png");
    }

    #[test]
    fn unknown_and_malformed_frames_are_ignored() {
        let session = open_session();
        assert!(session.on_frame(r#"{"type":"presence","data":{}}"#).is_none());
        assert!(session.on_frame("{").is_none());
    }

    #[test]
    fn blank_body_sends_nothing() {
        let mut session = session();
        assert_eq!(session.prepare_submission("   \n\t"), None);
        assert!(!session.is_sending());
    }

    #[test]
    fn one_submission_at_a_time() {
        let mut session = session();
        assert_eq!(session.prepare_submission("  hello "), Some("hello".to_string()));
        assert!(session.is_sending());
        assert_eq!(session.prepare_submission("again"), None);
        session.abort_submission();
        assert!(!session.is_sending());
    }

    #[test]
    fn echoes_locally_while_connecting() {
        let mut session = session();
        let body = session.prepare_submission("hello").unwrap();
        let entry = session.finish_submission(body, &accepted("9")).unwrap();

        let ChatEntry::Text(message) = entry else {
            panic!("expected text entry");
        };
        assert_eq!(message.id, "9");
        assert_eq!(message.content, "hello");
        assert_eq!(message.sender, Sender::Me);
        assert_eq!(
            message.timestamp,
            Utc.with_ymd_and_hms(2024, 1, 1, 10, 1, 0).unwrap()
        );
        assert!(!session.is_sending());
    }

    #[test]
    fn echoes_locally_while_reconnecting() {
        let mut session = open_session();
        session.on_transport_lost();
        let body = session.prepare_submission("still there?").unwrap();
        assert!(session.finish_submission(body, &accepted("10")).is_some());
    }

    #[test]
    fn no_echo_when_live_rebroadcast_is_expected() {
        let mut session = open_session();
        let body = session.prepare_submission("hello").unwrap();
        assert!(session.finish_submission(body, &accepted("9")).is_none());
        assert!(!session.is_sending());
    }

    #[test]
    fn refused_submission_renders_nothing_and_releases_send() {
        let mut session = session();
        let body = session.prepare_submission("hello").unwrap();
        let refused = SubmitResponse {
            status: "error".to_string(),
            message_id: None,
            timestamp: None,
        };
        assert!(session.finish_submission(body, &refused).is_none());
        assert!(!session.is_sending());
    }

    #[test]
    fn closed_session_refuses_new_messages() {
        let mut session = session();
        session.close();
        assert_eq!(session.prepare_submission("hello"), None);
        assert_eq!(session.session_id(), None);
    }
}
