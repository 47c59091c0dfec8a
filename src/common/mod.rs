pub mod commands;
pub mod events;
pub mod frame;
pub mod history;
pub mod types;

pub use commands::ChatCommand;
pub use events::ChatEvent;
pub use types::{ChatEntry, ChatMedia, ChatMessage, MediaKind, Sender, SessionId, TransportState};
