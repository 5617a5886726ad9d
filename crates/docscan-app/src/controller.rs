use std::sync::Arc;
use std::time::Duration;

use docscan_client::RecognitionClient;
use docscan_config::Config;
use docscan_core::{NotificationCenter, ScanSession, SessionEvent};
use kanal::{AsyncReceiver, AsyncSender, Receiver, Sender};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::commands::{UserCommand, read_commands};
use crate::events::event_loop;
use crate::render::Renderer;

/// Centralized channel management
pub struct ChannelSet {
    /// Sync side feeds from the stdin thread
    pub commands: (Sender<UserCommand>, Receiver<UserCommand>),
    pub session: (AsyncSender<SessionEvent>, AsyncReceiver<SessionEvent>),
}

impl ChannelSet {
    pub fn new() -> Self {
        Self {
            commands: kanal::bounded(64),
            session: kanal::bounded_async(64),
        }
    }
}

impl Default for ChannelSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Application controller for task spawning and lifecycle
pub struct AppController {
    channels: ChannelSet,
    config: Arc<Config>,
    client: Arc<dyn RecognitionClient>,
    cancel_token: CancellationToken,
}

impl AppController {
    pub fn new(config: Arc<Config>, client: Arc<dyn RecognitionClient>) -> Self {
        Self {
            channels: ChannelSet::new(),
            config,
            client,
            cancel_token: CancellationToken::new(),
        }
    }

    pub fn new_session(&self) -> ScanSession {
        let notifications =
            NotificationCenter::new(Duration::from_millis(self.config.notification.ttl_ms));
        ScanSession::new(
            Arc::clone(&self.client),
            notifications,
            self.channels.session.0.clone(),
        )
    }

    pub fn spawn_tasks(&self, renderer: Renderer) -> anyhow::Result<JoinSet<anyhow::Result<()>>> {
        let mut tasks = JoinSet::new();

        // Event loop
        tasks.spawn(event_loop(
            self.new_session(),
            self.channels.commands.1.clone().to_async(),
            self.channels.session.1.clone(),
            self.cancel_token.child_token(),
            renderer,
        ));

        // Stdin blocks, so it gets a plain thread the runtime never waits on
        let tx = self.channels.commands.0.clone();
        std::thread::Builder::new()
            .name("docscan-stdin".to_string())
            .spawn(move || read_commands(std::io::stdin().lock(), &tx))?;

        Ok(tasks)
    }

    pub fn session_events(&self) -> AsyncReceiver<SessionEvent> {
        self.channels.session.1.clone()
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}
