//! Wire format of the discussion channel.
//!
//! Frames pushed by the server are JSON envelopes `{"type": ..., "data": {...}}`.
//! The same `data` shapes are used by the history snapshot.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

use super::types::{ChatEntry, ChatMedia, ChatMessage, MediaKind, Sender};

/// Backend ids arrive either as strings or as integers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum WireId {
    Text(String),
    Number(i64),
}

impl From<WireId> for String {
    fn from(id: WireId) -> Self {
        match id {
            WireId::Text(text) => text,
            WireId::Number(number) => number.to_string(),
        }
    }
}

/// Accepts RFC 3339 instants and offset-less ISO timestamps (read as UTC).
pub fn deserialize_instant<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_instant(&raw).map_err(serde::de::Error::custom)
}

pub fn deserialize_optional_instant<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    raw.map(|value| parse_instant(&value).map_err(<D::Error as serde::de::Error>::custom))
        .transpose()
}

fn parse_instant(raw: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(instant.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|err| format!("invalid timestamp `{raw}`: {err}"))
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageData {
    pub id: WireId,
    pub content: String,
    pub sender: String,
    #[serde(deserialize_with = "deserialize_instant")]
    pub timestamp: DateTime<Utc>,
}

impl From<MessageData> for ChatMessage {
    fn from(data: MessageData) -> Self {
        Self {
            id: data.id.into(),
            content: data.content,
            sender: Sender::from_wire(&data.sender),
            timestamp: data.timestamp,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaData {
    pub id: WireId,
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub name: Option<String>,
    pub sender: String,
    #[serde(deserialize_with = "deserialize_instant")]
    pub timestamp: DateTime<Utc>,
}

impl From<MediaData> for ChatMedia {
    fn from(data: MediaData) -> Self {
        let display_name = data
            .name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| file_name_from_url(&data.url));
        Self {
            id: data.id.into(),
            sender: Sender::from_wire(&data.sender),
            timestamp: data.timestamp,
            kind: MediaKind::from_wire(&data.kind),
            url: data.url,
            mime_type: data.mime_type,
            display_name,
        }
    }
}

fn file_name_from_url(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .unwrap_or("attachment")
        .to_string()
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: serde_json::Value,
}

/// A decoded server push.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundFrame {
    NewMessage(ChatMessage),
    NewMedia(ChatMedia),
    /// Envelope type this client does not know; ignored by callers.
    Unknown(String),
}

impl InboundFrame {
    pub fn into_entry(self) -> Option<ChatEntry> {
        match self {
            Self::NewMessage(message) => Some(ChatEntry::Text(message)),
            Self::NewMedia(media) => Some(ChatEntry::Media(media)),
            Self::Unknown(_) => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),
}

pub fn parse_frame(text: &str) -> Result<InboundFrame, FrameError> {
    let envelope: Envelope = serde_json::from_str(text)?;
    match envelope.kind.as_str() {
        "new_message" => {
            let data: MessageData = serde_json::from_value(envelope.data)?;
            Ok(InboundFrame::NewMessage(data.into()))
        }
        "new_media" => {
            let data: MediaData = serde_json::from_value(envelope.data)?;
            Ok(InboundFrame::NewMedia(data.into()))
        }
        other => Ok(InboundFrame::Unknown(other.to_string())),
    }
}
