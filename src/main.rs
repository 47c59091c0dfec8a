use clap::Parser;
use dotenvy::dotenv;
use tokio::sync::mpsc;

use teleconsult_chat::common::ChatEntry;
use teleconsult_chat::common::history::load_history;
use teleconsult_chat::config::{self, ChatSettings, LaunchOverrides};
use teleconsult_chat::network::ChatClient;
use teleconsult_chat::ui::{ChatApp, Renderer, SessionLink};

#[derive(Parser)]
#[command(
    name = "teleconsult-chat",
    version,
    about = "Live chat panel for a teleconsultation session"
)]
struct Cli {
    /// Path to JSON config file
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH, value_name = "FILE")]
    config: String,
    /// Consultation session id; without one the chat stays inactive
    #[arg(long, env = "CHAT_SESSION_ID")]
    session: Option<String>,
    /// Dashboard origin, e.g. https://clinic.example
    #[arg(long, env = "CHAT_SERVER_URL")]
    server: Option<String>,
    #[arg(long, env = "CHAT_CSRF_TOKEN", hide_env_values = true)]
    csrf_token: Option<String>,
    /// JSON snapshot of the messages already exchanged
    #[arg(long, value_name = "FILE")]
    history: Option<String>,
}

impl Cli {
    fn overrides(&self) -> LaunchOverrides {
        LaunchOverrides {
            session_id: self.session.clone(),
            server_url: self.server.clone(),
            csrf_token: self.csrf_token.clone(),
            history_path: self.history.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), eframe::Error> {
    dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let app_config = config::load_config(&cli.config).with_overrides(cli.overrides());

    let settings = match app_config.chat_settings() {
        Ok(Some(settings)) => Some(settings),
        Ok(None) => {
            log::info!("No session id provided; chat stays inactive");
            None
        }
        Err(err) => {
            log::error!("Chat disabled: {err}");
            None
        }
    };
    let history = match (&settings, app_config.history_path.as_deref()) {
        (Some(_), Some(path)) => load_history(path),
        _ => Vec::new(),
    };

    run_chat(settings, history)
}

fn run_chat(settings: Option<ChatSettings>, history: Vec<ChatEntry>) -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions::default();

    let Some(settings) = settings else {
        return eframe::run_native(
            "Teleconsultation chat",
            options,
            Box::new(|cc| Ok(Box::new(ChatApp::inactive(cc)))),
        );
    };

    // 1. Channels between UI and controller
    // UI -> controller
    let (cmd_tx, cmd_rx) = mpsc::channel(100);
    // controller -> UI
    let (event_tx, event_rx) = mpsc::channel(100);

    // 2. Controller on the tokio runtime
    let client = ChatClient::new(&settings, event_tx, cmd_rx);
    tokio::spawn(client.run());

    // 3. UI on the main thread
    let mut link = Some(SessionLink {
        command_sender: cmd_tx,
        event_receiver: event_rx,
    });

    eframe::run_native(
        "Teleconsultation chat",
        options,
        Box::new(move |cc| {
            let link = link
                .take()
                .expect("ChatApp should only be initialized once");

            log::info!(
                "Chat window opened for session {} with {} history entries",
                settings.session_id,
                history.len()
            );

            let renderer = Renderer::new(
                settings.session_id.clone(),
                settings.server_url.clone(),
                settings.labels.clone(),
            );
            Ok(Box::new(ChatApp::new(cc, renderer, link, &history)))
        }),
    )
}
