use std::fs;
use std::path::Path;
use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::common::SessionId;
use crate::network::RECONNECT_DELAY;

pub const DEFAULT_CONFIG_PATH: &str = "config/chat.json";
const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000/";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Origin of the dashboard; HTTP endpoints and the live URL derive from it.
    pub server_url: String,
    /// Explicit live transport URL when the push server runs elsewhere.
    pub live_url: Option<String>,
    pub session_id: Option<String>,
    pub csrf_token: Option<String>,
    pub history_path: Option<String>,
    pub self_label: String,
    pub counterpart_label: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            live_url: None,
            session_id: None,
            csrf_token: None,
            history_path: None,
            self_label: "You".to_string(),
            counterpart_label: "Patient".to_string(),
        }
    }
}

pub fn load_config(path: &str) -> AppConfig {
    let path = Path::new(path);
    match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<AppConfig>(&content) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Failed to parse config file {}: {err}", path.display());
                AppConfig::default()
            }
        },
        Err(err) => {
            log::info!(
                "Config file {} not found ({err}); using defaults",
                path.display()
            );
            AppConfig::default()
        }
    }
}

/// Launch values (CLI flags or environment) that win over the config file.
#[derive(Debug, Clone, Default)]
pub struct LaunchOverrides {
    pub session_id: Option<String>,
    pub server_url: Option<String>,
    pub csrf_token: Option<String>,
    pub history_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenderLabels {
    pub me: String,
    pub counterpart: String,
}

/// Everything an active chat session needs.
#[derive(Debug, Clone)]
pub struct ChatSettings {
    pub session_id: SessionId,
    pub server_url: Url,
    pub live_url: Option<Url>,
    pub csrf_token: String,
    pub reconnect_delay: Duration,
    pub labels: SenderLabels,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid server URL `{url}`: {reason}")]
    InvalidServerUrl { url: String, reason: String },
    #[error("invalid live URL `{url}`: {reason}")]
    InvalidLiveUrl { url: String, reason: String },
}

impl AppConfig {
    pub fn with_overrides(mut self, overrides: LaunchOverrides) -> Self {
        if overrides.session_id.is_some() {
            self.session_id = overrides.session_id;
        }
        if let Some(server_url) = overrides.server_url {
            self.server_url = server_url;
        }
        if overrides.csrf_token.is_some() {
            self.csrf_token = overrides.csrf_token;
        }
        if overrides.history_path.is_some() {
            self.history_path = overrides.history_path;
        }
        self
    }

    pub fn labels(&self) -> SenderLabels {
        SenderLabels {
            me: self.self_label.clone(),
            counterpart: self.counterpart_label.clone(),
        }
    }

    /// `Ok(None)` when no session id is known: the chat stays inactive.
    pub fn chat_settings(&self) -> Result<Option<ChatSettings>, ConfigError> {
        let Some(session_id) = self.session_id.as_deref().and_then(SessionId::parse) else {
            return Ok(None);
        };

        let server_url =
            Url::parse(&self.server_url).map_err(|err| ConfigError::InvalidServerUrl {
                url: self.server_url.clone(),
                reason: err.to_string(),
            })?;
        let live_url = self
            .live_url
            .as_deref()
            .map(|raw| {
                Url::parse(raw).map_err(|err| ConfigError::InvalidLiveUrl {
                    url: raw.to_string(),
                    reason: err.to_string(),
                })
            })
            .transpose()?;

        let csrf_token = self.csrf_token.clone().unwrap_or_else(|| {
            log::warn!("No CSRF token configured; the server will likely refuse posts");
            String::new()
        });

        Ok(Some(ChatSettings {
            session_id,
            server_url,
            live_url,
            csrf_token,
            reconnect_delay: RECONNECT_DELAY,
            labels: self.labels(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn missing_file_uses_defaults() {
        let config = load_config("/nonexistent/chat.json");
        assert_eq!(config.server_url, DEFAULT_SERVER_URL);
        assert!(config.session_id.is_none());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"server_url": "https://clinic.test", "session_id": "42", "counterpart_label": "Patient A"}}"#
        )
        .unwrap();

        let config = load_config(file.path().to_str().unwrap());
        assert_eq!(config.server_url, "https://clinic.test");
        assert_eq!(config.session_id.as_deref(), Some("42"));
        assert_eq!(config.counterpart_label, "Patient A");
        assert_eq!(config.self_label, "You");
    }

    #[test]
    fn launch_values_override_file() {
        let config = AppConfig {
            session_id: Some("from-file".to_string()),
            csrf_token: Some("file-token".to_string()),
            ..AppConfig::default()
        }
        .with_overrides(LaunchOverrides {
            session_id: Some("abc123".to_string()),
            server_url: Some("https://clinic.test".to_string()),
            ..LaunchOverrides::default()
        });

        let settings = config.chat_settings().unwrap().unwrap();
        assert_eq!(settings.session_id.as_str(), "abc123");
        assert_eq!(settings.server_url.as_str(), "https://clinic.test/");
        assert_eq!(settings.csrf_token, "file-token");
        assert_eq!(settings.reconnect_delay, Duration::from_millis(3000));
    }

    #[test]
    fn reconnect_delay_is_not_configurable() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"session_id": "42", "reconnect_delay_ms": 0}}"#).unwrap();

        let settings = load_config(file.path().to_str().unwrap())
            .chat_settings()
            .unwrap()
            .unwrap();
        assert_eq!(settings.reconnect_delay, RECONNECT_DELAY);
    }

    #[test]
    fn no_session_means_inactive() {
        let config = AppConfig {
            session_id: Some("  ".to_string()),
            ..AppConfig::default()
        };
        assert!(config.chat_settings().unwrap().is_none());
    }

    #[test]
    fn bad_urls_are_reported() {
        let config = AppConfig {
            session_id: Some("1".to_string()),
            server_url: "not a url".to_string(),
            ..AppConfig::default()
        };
        assert!(matches!(
            config.chat_settings(),
            Err(ConfigError::InvalidServerUrl { .. })
        ));

        let config = AppConfig {
            session_id: Some("1".to_string()),
            live_url: Some("::".to_string()),
            ..AppConfig::default()
        };
        assert!(matches!(
            config.chat_settings(),
            Err(ConfigError::InvalidLiveUrl { .. })
        ));
    }
}
