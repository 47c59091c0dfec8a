use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::frame::{MediaData, MessageData};
use super::types::ChatEntry;

/// Transcript already persisted when the window opens.
#[derive(Debug, Default, Deserialize)]
pub struct HistorySnapshot {
    #[serde(default)]
    pub messages: Vec<MessageData>,
    #[serde(default)]
    pub media: Vec<MediaData>,
}

impl HistorySnapshot {
    /// Merges messages and media into one list ordered by timestamp.
    pub fn into_entries(self) -> Vec<ChatEntry> {
        let mut entries: Vec<ChatEntry> = self
            .messages
            .into_iter()
            .map(|data| ChatEntry::Text(data.into()))
            .chain(self.media.into_iter().map(|data| ChatEntry::Media(data.into())))
            .collect();
        entries.sort_by_key(ChatEntry::timestamp);
        entries
    }
}

pub fn load_history(path: &str) -> Vec<ChatEntry> {
    let path = Path::new(path);
    match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<HistorySnapshot>(&content) {
            Ok(snapshot) => {
                let entries = snapshot.into_entries();
                log::info!("Loaded {} history entries from {}", entries.len(), path.display());
                entries
            }
            Err(err) => {
                log::warn!("Failed to parse history file {}: {err}", path.display());
                Vec::new()
            }
        },
        Err(err) => {
            log::warn!("History file {} unreadable ({err}); starting empty", path.display());
            Vec::new()
        }
    }
}
