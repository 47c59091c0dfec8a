use reqwest::Url;
use urlencoding::encode;

use crate::common::SessionId;

pub fn discussion_path(session: &SessionId) -> String {
    format!("/medecins/discussion/{}/", encode(session.as_str()))
}

pub fn video_call_path(session: &SessionId) -> String {
    format!("/medecins/appel/{}/", encode(session.as_str()))
}

pub fn download_path(session: &SessionId, media_id: &str) -> String {
    format!(
        "/medecins/download/{}/{}/",
        encode(session.as_str()),
        encode(media_id)
    )
}

pub fn live_path(session: &SessionId) -> String {
    format!("/ws/discussion/{}/", encode(session.as_str()))
}

/// Resolves a server-relative path; absolute URLs pass through unchanged.
pub fn resolve(server: &Url, path: &str) -> String {
    match server.join(path) {
        Ok(url) => url.to_string(),
        Err(err) => {
            log::debug!("Cannot resolve `{path}` against {server}: {err}");
            path.to_string()
        }
    }
}
