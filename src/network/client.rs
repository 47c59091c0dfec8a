use std::time::Duration;

use futures::StreamExt;
use reqwest::Url;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::{self, Message};

use crate::common::{ChatCommand, ChatEvent};
use crate::config::ChatSettings;

use super::session::ChatSession;
use super::submit::{DiscussionEndpoint, SubmitError, SubmitResponse};
use super::transport::{self, TransportError, WsStream};

/// Completions of work spawned by the loop, fed back into it.
enum Internal {
    Connected(Result<WsStream, TransportError>),
    ReconnectDue,
    Submitted {
        body: String,
        result: Result<SubmitResponse, SubmitError>,
    },
    CloseFinished(Result<(), SubmitError>),
    VideoCallFinished(Result<(), SubmitError>),
}

/// Owns the live transport and the request/response endpoint of one session.
pub struct ChatClient {
    session: ChatSession,
    endpoint: DiscussionEndpoint,
    live_url: Option<Url>,
    connection: Option<WsStream>,
    connecting: bool,
    event_sender: mpsc::Sender<ChatEvent>,
    command_receiver: mpsc::Receiver<ChatCommand>,
    internal_sender: mpsc::Sender<Internal>,
    internal_receiver: mpsc::Receiver<Internal>,
}

impl ChatClient {
    pub fn new(
        settings: &ChatSettings,
        event_sender: mpsc::Sender<ChatEvent>,
        command_receiver: mpsc::Receiver<ChatCommand>,
    ) -> Self {
        let live_url = match &settings.live_url {
            Some(url) => transport::check_live_url(url),
            None => transport::live_url(&settings.server_url, &settings.session_id),
        };
        let live_url = match live_url {
            Ok(url) => Some(url),
            Err(err) => {
                log::error!("Live transport disabled: {err}");
                None
            }
        };
        let (internal_sender, internal_receiver) = mpsc::channel(32);

        Self {
            session: ChatSession::new(settings.session_id.clone())
                .with_reconnect_delay(settings.reconnect_delay),
            endpoint: DiscussionEndpoint::new(
                settings.server_url.clone(),
                settings.session_id.clone(),
                settings.csrf_token.clone(),
            ),
            live_url,
            connection: None,
            connecting: false,
            event_sender,
            command_receiver,
            internal_sender,
            internal_receiver,
        }
    }

    /// Runs until the UI drops its command sender.
    pub async fn run(mut self) {
        if let Some(session_id) = self.session.session_id() {
            log::info!("Chat controller started for session {session_id}");
        }
        self.start_connect().await;

        loop {
            tokio::select! {
                command = self.command_receiver.recv() => {
                    match command {
                        Some(command) => self.handle_command(command).await,
                        None => break,
                    }
                }
                Some(internal) = self.internal_receiver.recv() => {
                    self.handle_internal(internal).await;
                }
                frame = next_frame(&mut self.connection) => {
                    self.handle_frame(frame).await;
                }
            }
        }

        if let Some(mut connection) = self.connection.take() {
            let _ = connection.close(None).await;
        }
        log::info!("Chat controller stopped");
    }

    async fn handle_command(&mut self, command: ChatCommand) {
        match command {
            ChatCommand::SendMessage(body) => {
                let Some(body) = self.session.prepare_submission(&body) else {
                    return;
                };
                self.emit(ChatEvent::SendStarted).await;

                let endpoint = self.endpoint.clone();
                let sender = self.internal_sender.clone();
                tokio::spawn(async move {
                    let result = endpoint.submit_message(&body).await;
                    let _ = sender.send(Internal::Submitted { body, result }).await;
                });
            }
            ChatCommand::AttachmentSelected { kind, path } => {
                log::info!("{kind} attachment selected: {}", path.display());
                let name = path
                    .file_name()
                    .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned());
                self.emit(ChatEvent::Notice(format!("{name} selected for upload")))
                    .await;
            }
            ChatCommand::StartVideoCall => {
                if !self.session.is_active() {
                    return;
                }
                let endpoint = self.endpoint.clone();
                let sender = self.internal_sender.clone();
                tokio::spawn(async move {
                    let result = endpoint.request_video_call().await;
                    let _ = sender.send(Internal::VideoCallFinished(result)).await;
                });
            }
            ChatCommand::CloseSession => {
                if !self.session.is_active() {
                    return;
                }
                let endpoint = self.endpoint.clone();
                let sender = self.internal_sender.clone();
                tokio::spawn(async move {
                    let result = endpoint.close_session().await;
                    let _ = sender.send(Internal::CloseFinished(result)).await;
                });
            }
        }
    }

    async fn handle_internal(&mut self, internal: Internal) {
        match internal {
            Internal::Connected(result) => {
                self.connecting = false;
                match result {
                    Ok(mut stream) => {
                        if !self.session.is_active() {
                            let _ = stream.close(None).await;
                            return;
                        }
                        log::info!("Live transport open");
                        self.connection = Some(stream);
                        self.session.on_transport_opened();
                        self.emit_transport_state().await;
                    }
                    Err(err) => {
                        log::warn!("Live transport connect failed: {err}");
                        self.transport_lost().await;
                    }
                }
            }
            Internal::ReconnectDue => self.start_connect().await,
            Internal::Submitted { body, result } => match result {
                Ok(response) => {
                    let accepted = response.is_success();
                    if let Some(entry) = self.session.finish_submission(body, &response) {
                        self.emit(ChatEvent::EntryAdded(entry)).await;
                    }
                    self.emit(ChatEvent::SendFinished { accepted }).await;
                }
                Err(err) => {
                    self.session.abort_submission();
                    log::error!("Message submission failed: {err}");
                    self.emit(ChatEvent::Alert(format!("Message not sent: {err}")))
                        .await;
                    self.emit(ChatEvent::SendFinished { accepted: false }).await;
                }
            },
            Internal::CloseFinished(Ok(())) => {
                self.session.close();
                if let Some(mut connection) = self.connection.take() {
                    let _ = connection.close(None).await;
                }
                log::info!("Consultation closed");
                self.emit_transport_state().await;
                self.emit(ChatEvent::SessionClosed).await;
            }
            Internal::CloseFinished(Err(err)) => {
                log::error!("Closing consultation failed: {err}");
                self.emit(ChatEvent::Alert(format!("Could not close the consultation: {err}")))
                    .await;
            }
            Internal::VideoCallFinished(Ok(())) => {
                self.emit(ChatEvent::Notice("Video call link sent".to_string()))
                    .await;
            }
            Internal::VideoCallFinished(Err(err)) => {
                log::error!("Video call request failed: {err}");
                self.emit(ChatEvent::Alert(format!("Could not start the video call: {err}")))
                    .await;
            }
        }
    }

    async fn handle_frame(&mut self, frame: Option<Result<Message, tungstenite::Error>>) {
        match frame {
            Some(Ok(Message::Text(text))) => {
                if let Some(entry) = self.session.on_frame(text.as_str()) {
                    self.emit(ChatEvent::EntryAdded(entry)).await;
                }
            }
            Some(Ok(Message::Close(reason))) => {
                log::info!("Live transport closed by server: {reason:?}");
                self.transport_lost().await;
            }
            Some(Ok(_)) => {}
            Some(Err(err)) => {
                log::warn!("Live transport error: {err}");
                self.transport_lost().await;
            }
            None => {
                log::info!("Live transport ended");
                self.transport_lost().await;
            }
        }
    }

    async fn start_connect(&mut self) {
        let Some(url) = self.live_url.clone() else {
            self.session.on_transport_unavailable();
            self.emit_transport_state().await;
            return;
        };
        if self.connection.is_some() || self.connecting {
            log::debug!("Live transport already present; skipping connect");
            return;
        }
        if !self.session.begin_connect() {
            log::debug!("Reconnect timer fired after session end");
            return;
        }

        self.connecting = true;
        self.emit_transport_state().await;
        log::debug!("Connecting live transport to {url}");

        let sender = self.internal_sender.clone();
        tokio::spawn(async move {
            let result = transport::connect(&url).await;
            let _ = sender.send(Internal::Connected(result)).await;
        });
    }

    async fn transport_lost(&mut self) {
        self.connection = None;
        if let Some(delay) = self.session.on_transport_lost() {
            log::info!("Reconnecting live transport in {}ms", delay.as_millis());
            schedule_reconnect(self.internal_sender.clone(), delay);
        }
        self.emit_transport_state().await;
    }

    async fn emit_transport_state(&self) {
        self.emit(ChatEvent::TransportChanged(self.session.transport_state()))
            .await;
    }

    async fn emit(&self, event: ChatEvent) {
        if let Err(err) = self.event_sender.send(event).await {
            log::warn!("Failed to notify UI: {err}");
        }
    }
}

/// Fire-once timer; never cancelled, a late firing is filtered by the session.
fn schedule_reconnect(sender: mpsc::Sender<Internal>, delay: Duration) {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let _ = sender.send(Internal::ReconnectDue).await;
    });
}

async fn next_frame(
    connection: &mut Option<WsStream>,
) -> Option<Result<Message, tungstenite::Error>> {
    match connection {
        Some(stream) => stream.next().await,
        None => std::future::pending().await,
    }
}
