use reqwest::Url;
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use crate::common::SessionId;

use super::endpoints::live_path;

pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("server URL scheme `{0}` has no live transport equivalent")]
    UnsupportedScheme(String),
    #[error("server URL has no host")]
    MissingHost,
    #[error("invalid live transport URL: {0}")]
    InvalidUrl(String),
    #[error("websocket handshake failed: {0}")]
    Handshake(#[source] tokio_tungstenite::tungstenite::Error),
}

/// Derives `{ws|wss}://{host}/ws/discussion/{session}/` from the server URL;
/// the scheme mirrors the page scheme.
pub fn live_url(server: &Url, session: &SessionId) -> Result<Url, TransportError> {
    let scheme = match server.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        other => return Err(TransportError::UnsupportedScheme(other.to_string())),
    };
    let host = server.host_str().ok_or(TransportError::MissingHost)?;
    let authority = match server.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    };

    Url::parse(&format!("{scheme}://{authority}{}", live_path(session)))
        .map_err(|err| TransportError::InvalidUrl(err.to_string()))
}

/// Accepts an explicitly configured live URL only when it speaks WebSocket.
pub fn check_live_url(url: &Url) -> Result<Url, TransportError> {
    match url.scheme() {
        "ws" | "wss" => {}
        other => return Err(TransportError::UnsupportedScheme(other.to_string())),
    }
    if url.host_str().is_none() {
        return Err(TransportError::MissingHost);
    }
    Ok(url.clone())
}

pub async fn connect(url: &Url) -> Result<WsStream, TransportError> {
    let (stream, response) = connect_async(url.as_str())
        .await
        .map_err(TransportError::Handshake)?;
    log::debug!("Live transport handshake answered {}", response.status());
    Ok(stream)
}
