use std::sync::mpsc;
use std::thread;

use crawlchat_core::{Effect, IngestReceipt, Msg, ServiceFailure, SessionStatus};
use crawlchat_engine::{EngineEvent, EngineEvents, EngineHandle, FailureKind, ServiceError};
use crawlchat_logging::{chat_debug, chat_info, chat_warn};

use super::app::LoopEvent;

pub(crate) struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(
        engine: EngineHandle,
        events: EngineEvents,
        loop_tx: mpsc::Sender<LoopEvent>,
    ) -> Self {
        spawn_event_loop(events, loop_tx);
        Self { engine }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FetchStatus => {
                    chat_debug!("FetchStatus");
                    self.engine.fetch_status();
                }
                Effect::SubmitIngest { url } => {
                    chat_info!("SubmitIngest url_len={} url={}", url.len(), url);
                    self.engine.crawl(url);
                }
                Effect::SubmitQuery { query } => {
                    chat_info!("SubmitQuery query_len={}", query.len());
                    self.engine.chat(query);
                }
            }
        }
    }

    pub fn session_cookie(&self) -> Option<String> {
        self.engine.session_cookie()
    }

}

fn spawn_event_loop(events: EngineEvents, loop_tx: mpsc::Sender<LoopEvent>) {
    thread::spawn(move || {
        while let Some(event) = events.recv() {
            if loop_tx.send(LoopEvent::Core(map_event(event))).is_err() {
                break;
            }
        }
    });
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::StatusLoaded(result) => Msg::StatusLoaded(
            result
                .map(|status| SessionStatus {
                    has_documents: status.has_documents,
                    crawled_url: status.crawled_url,
                    pages_count: status.pages_count,
                })
                .map_err(map_failure),
        ),
        EngineEvent::CrawlCompleted(result) => Msg::IngestFinished(
            result
                .map(|summary| IngestReceipt {
                    message: summary.message,
                    pages_count: summary.pages_count,
                })
                .map_err(map_failure),
        ),
        EngineEvent::AnswerReceived(result) => Msg::QueryFinished(result.map_err(map_failure)),
    }
}

fn map_failure(err: ServiceError) -> ServiceFailure {
    match err.kind {
        FailureKind::Rejected { error } => ServiceFailure::Application { message: error },
        _ => {
            chat_warn!("request failed: {}", err);
            ServiceFailure::Transport {
                detail: err.to_string(),
            }
        }
    }
}
