use std::path::PathBuf;

use super::types::MediaKind;

/// Commands the UI sends to the chat controller.
#[derive(Debug, Clone)]
pub enum ChatCommand {
    /// Raw input text; trimmed and validated by the controller.
    SendMessage(String),
    /// A file chosen through the attachment dialog. Upload is handled by an
    /// external uploader, the controller only acknowledges it.
    AttachmentSelected { kind: MediaKind, path: PathBuf },
    StartVideoCall,
    CloseSession,
}
