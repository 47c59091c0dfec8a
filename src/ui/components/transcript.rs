use eframe::egui;

use crate::ui::render::{Alignment, RenderedBody, RenderedEntry};
use crate::ui::state::AppState;

const THUMBNAIL_MAX_WIDTH: f32 = 240.0;

pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .stick_to_bottom(true)
        .show(ui, |ui| {
            if state.transcript.is_empty() {
                ui.label(egui::RichText::new("No messages yet").weak());
            }
            for entry in &state.transcript {
                render_entry(ui, entry);
                ui.add_space(6.0);
            }
            if state.scroll_to_bottom {
                ui.scroll_to_cursor(Some(egui::Align::BOTTOM));
                state.scroll_to_bottom = false;
            }
        });
}

fn render_entry(ui: &mut egui::Ui, entry: &RenderedEntry) {
    let (layout, fill) = match entry.alignment {
        Alignment::Sent => (
            egui::Layout::top_down(egui::Align::Max),
            ui.visuals().selection.bg_fill.gamma_multiply(0.35),
        ),
        Alignment::Received => (
            egui::Layout::top_down(egui::Align::Min),
            ui.visuals().faint_bg_color,
        ),
    };

    ui.with_layout(layout, |ui| {
        egui::Frame::group(ui.style()).fill(fill).show(ui, |ui| {
            ui.set_max_width(ui.available_width() * 0.7);
            ui.vertical(|ui| {
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(entry.sender_label.as_str()).strong());
                    ui.label(egui::RichText::new(entry.time_of_day.as_str()).weak().small());
                });
                render_body(ui, &entry.body);
            });
        });
    });
}

fn render_body(ui: &mut egui::Ui, body: &RenderedBody) {
    match body {
        RenderedBody::Text { lines } => {
            for line in lines {
                ui.label(line.as_str());
            }
        }
        RenderedBody::Image {
            src,
            name,
            download_url,
        } => {
            ui.add(
                egui::Image::from_uri(src.as_str())
                    .max_width(THUMBNAIL_MAX_WIDTH)
                    .corner_radius(4.0),
            )
            .on_hover_text(name.as_str());
            ui.horizontal(|ui| {
                ui.hyperlink_to("Open full size", src);
                ui.hyperlink_to("Download", download_url);
            });
        }
        RenderedBody::Audio {
            src,
            mime_type,
            download_url,
        } => {
            ui.horizontal(|ui| {
                ui.hyperlink_to("▶ Play audio", src);
                ui.label(egui::RichText::new(mime_type.as_str()).weak().small());
                ui.hyperlink_to("Download", download_url);
            });
        }
        RenderedBody::Video {
            src,
            mime_type,
            download_url,
        } => {
            ui.horizontal(|ui| {
                ui.hyperlink_to("▶ Play video", src);
                ui.label(egui::RichText::new(mime_type.as_str()).weak().small());
                ui.hyperlink_to("Download", download_url);
            });
        }
        RenderedBody::File { name, download_url } => {
            ui.horizontal(|ui| {
                ui.label(format!("📎 {name}"));
                ui.hyperlink_to("Download", download_url);
            });
        }
    }
}
