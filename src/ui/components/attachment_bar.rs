use std::path::PathBuf;

use eframe::egui;

use crate::common::MediaKind;
use crate::ui::state::AppState;

const KINDS: [(MediaKind, &str); 4] = [
    (MediaKind::Image, "🖼 Image"),
    (MediaKind::Audio, "🎤 Audio"),
    (MediaKind::Video, "🎬 Video"),
    (MediaKind::File, "📎 File"),
];

/// Dialog filter for a kind; `None` accepts any file.
pub fn file_filter(kind: MediaKind) -> Option<(&'static str, &'static [&'static str])> {
    match kind {
        MediaKind::Image => Some(("Images", &["png", "jpg", "jpeg", "gif", "webp"])),
        MediaKind::Audio => Some(("Audio", &["mp3", "wav", "ogg", "m4a", "webm"])),
        MediaKind::Video => Some(("Video", &["mp4", "webm", "mov", "mkv"])),
        MediaKind::File => None,
    }
}

fn pick_file(kind: MediaKind) -> Option<PathBuf> {
    let mut dialog = rfd::FileDialog::new().set_title(format!("Choose {kind} file"));
    if let Some((name, extensions)) = file_filter(kind) {
        dialog = dialog.add_filter(name, extensions);
    }
    dialog.pick_file()
}

pub fn render(ui: &mut egui::Ui, state: &AppState) -> Option<(MediaKind, PathBuf)> {
    let mut chosen = None;
    ui.horizontal(|ui| {
        for (kind, label) in KINDS {
            if ui
                .add_enabled(!state.session_closed, egui::Button::new(label))
                .clicked()
            {
                match pick_file(kind) {
                    Some(path) => chosen = Some((kind, path)),
                    None => log::debug!("{kind} file dialog cancelled"),
                }
            }
        }
    });
    chosen
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_kinds_filter_their_extensions() {
        let (name, extensions) = file_filter(MediaKind::Image).unwrap();
        assert_eq!(name, "Images");
        assert!(extensions.contains(&"png"));

        assert!(file_filter(MediaKind::Audio).unwrap().1.contains(&"mp3"));
        assert!(file_filter(MediaKind::Video).unwrap().1.contains(&"mp4"));
        assert!(file_filter(MediaKind::File).is_none());
    }
}
