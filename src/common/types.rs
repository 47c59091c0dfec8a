use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque identifier of one consultation thread.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Returns `None` for blank input, which leaves the chat inactive.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who authored an entry, seen from the local clinician.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    Me,
    Counterpart,
}

impl Sender {
    /// Maps backend sender tags; the clinician side is `self`/`medecin`.
    pub fn from_wire(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "self" | "medecin" | "doctor" => Self::Me,
            _ => Self::Counterpart,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Audio,
    Video,
    File,
}

impl MediaKind {
    /// `document`, `other` and anything unrecognised render as a plain file.
    pub fn from_wire(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "image" => Self::Image,
            "audio" => Self::Audio,
            "video" => Self::Video,
            _ => Self::File,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Audio => "audio",
            Self::Video => "video",
            Self::File => "file",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Text entry of the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub content: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

/// Media entry of the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMedia {
    pub id: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    pub kind: MediaKind,
    pub url: String,
    pub mime_type: String,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEntry {
    Text(ChatMessage),
    Media(ChatMedia),
}

impl ChatEntry {
    pub fn id(&self) -> &str {
        match self {
            Self::Text(message) => &message.id,
            Self::Media(media) => &media.id,
        }
    }

    pub fn sender(&self) -> Sender {
        match self {
            Self::Text(message) => message.sender,
            Self::Media(media) => media.sender,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::Text(message) => message.timestamp,
            Self::Media(media) => media.timestamp,
        }
    }
}

/// Live transport lifecycle as seen by the controller and the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportState {
    Connecting,
    Open,
    /// Closed, a reconnect attempt is scheduled.
    Reconnecting,
    /// Closed for good: the session ended or no live URL could be built.
    Terminated,
}

impl TransportState {
    pub fn label(self) -> &'static str {
        match self {
            Self::Connecting => "connecting",
            Self::Open => "live",
            Self::Reconnecting => "reconnecting",
            Self::Terminated => "offline",
        }
    }
}
