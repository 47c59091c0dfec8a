use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{StatusCode, Url};
use serde::Deserialize;

use crate::common::SessionId;
use crate::common::frame::{WireId, deserialize_optional_instant};

use super::endpoints::{discussion_path, video_call_path};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Body returned by the discussion endpoint after a message post.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SubmitResponse {
    pub status: String,
    #[serde(default)]
    pub message_id: Option<WireId>,
    #[serde(default, deserialize_with = "deserialize_optional_instant")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl SubmitResponse {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("server answered {0}")]
    Status(StatusCode),
    #[error("unreadable server response: {0}")]
    Decode(String),
    #[error("invalid endpoint URL: {0}")]
    Url(String),
}

/// Request/response side of the discussion: message posts and the
/// consultation actions. Cheap to clone.
#[derive(Debug, Clone)]
pub struct DiscussionEndpoint {
    http: reqwest::Client,
    server: Url,
    session: SessionId,
    csrf_token: String,
}

impl DiscussionEndpoint {
    pub fn new(server: Url, session: SessionId, csrf_token: String) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|err| {
                log::warn!("Falling back to default HTTP client: {err}");
                reqwest::Client::new()
            });
        Self {
            http,
            server,
            session,
            csrf_token,
        }
    }

    fn url(&self, path: &str) -> Result<Url, SubmitError> {
        self.server
            .join(path)
            .map_err(|err| SubmitError::Url(err.to_string()))
    }

    async fn post_form(
        &self,
        path: &str,
        fields: &[(&str, &str)],
    ) -> Result<reqwest::Response, SubmitError> {
        let url = self.url(path)?;
        let mut form = vec![("csrfmiddlewaretoken", self.csrf_token.as_str())];
        form.extend_from_slice(fields);

        let response = self
            .http
            .post(url)
            .header("X-CSRFToken", &self.csrf_token)
            .header("X-Requested-With", "XMLHttpRequest")
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SubmitError::Status(status));
        }
        Ok(response)
    }

    /// Posts one message. This path persists the message whatever the state
    /// of the live transport.
    pub async fn submit_message(&self, body: &str) -> Result<SubmitResponse, SubmitError> {
        let response = self
            .post_form(&discussion_path(&self.session), &[("message", body)])
            .await?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|err| SubmitError::Decode(err.to_string()))
    }

    pub async fn close_session(&self) -> Result<(), SubmitError> {
        self.post_form(&discussion_path(&self.session), &[("close_session", "1")])
            .await?;
        Ok(())
    }

    /// Asks the server to generate a call link; the link comes back as a chat
    /// message over the live channel.
    pub async fn request_video_call(&self) -> Result<(), SubmitError> {
        self.post_form(&video_call_path(&self.session), &[]).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_requires_exact_status() {
        let ok: SubmitResponse = serde_json::from_str(
            r#"{"status":"success","message_id":9,"timestamp":"2024-01-01T10:01:00Z"}"#,
        )
        .unwrap();
        assert!(ok.is_success());
        assert_eq!(ok.message_id, Some(WireId::Number(9)));

        let rejected: SubmitResponse =
            serde_json::from_str(r#"{"status":"error","message":"empty"}"#).unwrap();
        assert!(!rejected.is_success());
        assert_eq!(rejected.message_id, None);
        assert_eq!(rejected.timestamp, None);
    }
}
