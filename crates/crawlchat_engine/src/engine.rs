use std::sync::{mpsc, Arc};
use std::thread;

use crawlchat_logging::{chat_debug, chat_error};

use crate::client::ServiceTransport;
use crate::EngineEvent;

enum EngineCommand {
    FetchStatus,
    Crawl { url: String },
    Chat { query: String },
}

/// Runs service requests on a tokio runtime owned by a worker thread.
///
/// Commands are not serialized here: a crawl and a chat can be in flight at
/// the same time. Keeping one request per workflow is the caller's job.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    transport: Arc<dyn ServiceTransport>,
}

/// Receiving end of the engine. Owned by exactly one consumer.
pub struct EngineEvents {
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineEvents {
    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Block until the next event. `None` once the worker is gone.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }
}

impl EngineHandle {
    pub fn start(transport: Arc<dyn ServiceTransport>) -> std::io::Result<(Self, EngineEvents)> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;

        let worker_transport = transport.clone();
        thread::Builder::new()
            .name("crawlchat-engine".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let transport = worker_transport.clone();
                    let event_tx = event_tx.clone();
                    runtime.spawn(async move {
                        handle_command(transport.as_ref(), command, event_tx).await;
                    });
                }
                chat_debug!("engine command channel closed");
            })?;

        Ok((Self { cmd_tx, transport }, EngineEvents { event_rx }))
    }

    pub fn fetch_status(&self) {
        self.send(EngineCommand::FetchStatus);
    }

    pub fn crawl(&self, url: impl Into<String>) {
        self.send(EngineCommand::Crawl { url: url.into() });
    }

    pub fn chat(&self, query: impl Into<String>) {
        self.send(EngineCommand::Chat {
            query: query.into(),
        });
    }

    pub fn session_cookie(&self) -> Option<String> {
        self.transport.session_cookie()
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            chat_error!("engine worker is gone; request dropped");
        }
    }
}

async fn handle_command(
    transport: &dyn ServiceTransport,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let event = match command {
        EngineCommand::FetchStatus => EngineEvent::StatusLoaded(transport.status().await),
        EngineCommand::Crawl { url } => EngineEvent::CrawlCompleted(transport.crawl(&url).await),
        EngineCommand::Chat { query } => {
            EngineEvent::AnswerReceived(transport.chat(&query).await)
        }
    };
    let _ = event_tx.send(event);
}
