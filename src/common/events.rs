use super::types::{ChatEntry, TransportState};

/// Events the chat controller pushes up to the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    EntryAdded(ChatEntry),
    TransportChanged(TransportState),
    /// A submission is in flight; the send control must be disabled.
    SendStarted,
    /// The submission ended. `accepted` means the input can be cleared.
    SendFinished { accepted: bool },
    /// Transient status line.
    Notice(String),
    /// Blocking error the user has to acknowledge.
    Alert(String),
    SessionClosed,
}
