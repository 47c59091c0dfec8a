//! Turns transcript entries into display blocks.

use chrono::{DateTime, Local, TimeZone, Utc};
use reqwest::Url;

use crate::common::{ChatEntry, ChatMedia, MediaKind, Sender, SessionId};
use crate::config::SenderLabels;
use crate::network::endpoints::{download_path, resolve};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    /// Right-aligned, sent by the local clinician.
    Sent,
    /// Left-aligned, received from the counterpart.
    Received,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedBody {
    Text {
        lines: Vec<String>,
    },
    Image {
        src: String,
        name: String,
        download_url: String,
    },
    Audio {
        src: String,
        mime_type: String,
        download_url: String,
    },
    Video {
        src: String,
        mime_type: String,
        download_url: String,
    },
    File {
        name: String,
        download_url: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEntry {
    pub id: String,
    pub alignment: Alignment,
    pub sender_label: String,
    pub time_of_day: String,
    pub body: RenderedBody,
}

pub struct Renderer {
    session: SessionId,
    server: Url,
    labels: SenderLabels,
}

impl Renderer {
    pub fn new(session: SessionId, server: Url, labels: SenderLabels) -> Self {
        Self {
            session,
            server,
            labels,
        }
    }

    pub fn session(&self) -> &SessionId {
        &self.session
    }

    pub fn render(&self, entry: &ChatEntry) -> RenderedEntry {
        self.render_in(entry, &Local)
    }

    pub fn render_in<Tz: TimeZone>(&self, entry: &ChatEntry, zone: &Tz) -> RenderedEntry
    where
        Tz::Offset: std::fmt::Display,
    {
        let sender = entry.sender();
        let body = match entry {
            ChatEntry::Text(message) => RenderedBody::Text {
                lines: split_lines(&message.content),
            },
            ChatEntry::Media(media) => self.media_body(media),
        };

        RenderedEntry {
            id: entry.id().to_string(),
            alignment: match sender {
                Sender::Me => Alignment::Sent,
                Sender::Counterpart => Alignment::Received,
            },
            sender_label: match sender {
                Sender::Me => self.labels.me.clone(),
                Sender::Counterpart => self.labels.counterpart.clone(),
            },
            time_of_day: time_of_day(entry.timestamp(), zone),
            body,
        }
    }

    fn media_body(&self, media: &ChatMedia) -> RenderedBody {
        let src = resolve(&self.server, &media.url);
        let download_url = resolve(&self.server, &download_path(&self.session, &media.id));
        match media.kind {
            MediaKind::Image => RenderedBody::Image {
                src,
                name: media.display_name.clone(),
                download_url,
            },
            MediaKind::Audio => RenderedBody::Audio {
                src,
                mime_type: media.mime_type.clone(),
                download_url,
            },
            MediaKind::Video => RenderedBody::Video {
                src,
                mime_type: media.mime_type.clone(),
                download_url,
            },
            MediaKind::File => RenderedBody::File {
                name: media.display_name.clone(),
                download_url,
            },
        }
    }
}

/// Every newline starts a line, including a trailing one.
fn split_lines(content: &str) -> Vec<String> {
    content
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect()
}

fn time_of_day<Tz: TimeZone>(timestamp: DateTime<Utc>, zone: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    timestamp.with_timezone(zone).format("%H:%M").to_string()
}
