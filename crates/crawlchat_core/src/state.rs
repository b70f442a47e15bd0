use crawlchat_logging::{chat_debug, chat_info, chat_warn};

use crate::conversation::ConversationState;
use crate::ingestion::{IngestCompletion, IngestionPhase, IngestionState};
use crate::service::{IngestReceipt, ServiceFailure, SessionStatus};
use crate::sync::SessionSync;
use crate::view_model::{AppViewModel, LogRowView};

/// Why a submission was turned away. Rejections never change workflow state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("a crawl is already in progress")]
    AlreadyInFlight,
    #[error("still waiting for the previous answer")]
    AlreadyAwaiting,
    #[error("crawl a website before asking questions")]
    Locked,
    #[error("nothing to submit")]
    BlankInput,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    ingestion: IngestionState,
    conversation: ConversationState,
    sync: SessionSync,
    last_rejection: Option<SubmitError>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ingestion(&self) -> &IngestionState {
        &self.ingestion
    }

    pub fn conversation(&self) -> &ConversationState {
        &self.conversation
    }

    pub fn sync(&self) -> &SessionSync {
        &self.sync
    }

    pub fn view(&self) -> AppViewModel {
        let mut rows: Vec<LogRowView> = self
            .conversation
            .log()
            .snapshot()
            .iter()
            .map(LogRowView::from_entry)
            .collect();
        if self.conversation.log().is_typing() {
            rows.push(LogRowView::Typing);
        }

        AppViewModel {
            ingestion_phase: self.ingestion.phase(),
            conversation_phase: self.conversation.phase(),
            url_input: self.ingestion.url_input().to_string(),
            query_input: self.conversation.query_input().to_string(),
            ingest_controls_enabled: self.ingestion.controls_enabled(),
            query_controls_enabled: self.conversation.controls_enabled(),
            query_focused: self.conversation.wants_focus(),
            target_url: self.ingestion.target_url().map(str::to_string),
            pages_count: self.ingestion.pages_count(),
            banner: self.ingestion.banner().cloned(),
            progress: self.ingestion.progress(),
            rows,
            last_rejection: self.last_rejection,
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_url_input(&mut self, text: String) {
        if self.ingestion.url_input() != text {
            self.ingestion.set_url_input(text);
            self.mark_dirty();
        }
    }

    pub(crate) fn set_query_input(&mut self, text: String) {
        if self.conversation.query_input() != text {
            self.conversation.set_query_input(text);
            self.mark_dirty();
        }
    }

    pub(crate) fn begin_sync(&mut self) -> bool {
        self.sync.begin()
    }

    pub(crate) fn apply_status(&mut self, result: Result<SessionStatus, ServiceFailure>) {
        if let Err(failure) = &result {
            chat_debug!("status query failed, chat stays locked: {:?}", failure);
        }
        let Some(status) = self.sync.resolve(result) else {
            return;
        };

        if self.conversation.unlock() {
            self.mark_dirty();
        }

        let crawled_url = status.crawled_url.filter(|url| !url.trim().is_empty());
        if let Some(url) = crawled_url {
            // A crawl started in this session wins over the stored one.
            if self.ingestion.phase() != IngestionPhase::Idle {
                return;
            }
            let announcement = match status.pages_count {
                Some(count) => {
                    format!("Ready to answer questions about {url} ({count} pages indexed).")
                }
                None => format!("Ready to answer questions about {url}."),
            };
            chat_info!("restored session for {}", url);
            self.ingestion.restore_summary(url, status.pages_count);
            self.conversation.announce(announcement);
            self.mark_dirty();
        }
    }

    pub(crate) fn submit_ingest(&mut self) -> Result<String, SubmitError> {
        let url = self.ingestion.submit()?;
        self.mark_dirty();
        Ok(url)
    }

    pub(crate) fn finish_ingest(&mut self, result: Result<IngestReceipt, ServiceFailure>) {
        match self.ingestion.finish(result) {
            Some(IngestCompletion::Ready { url }) => {
                self.conversation
                    .announce(format!("Finished crawling {url}. Ask me anything about it."));
                self.conversation.unlock();
                self.mark_dirty();
            }
            Some(IngestCompletion::Failed) => self.mark_dirty(),
            None => chat_warn!("crawl reply arrived with no crawl in flight; ignored"),
        }
    }

    pub(crate) fn submit_query(&mut self) -> Result<String, SubmitError> {
        let query = self.conversation.submit()?;
        self.mark_dirty();
        Ok(query)
    }

    pub(crate) fn finish_query(&mut self, result: Result<String, ServiceFailure>) {
        if self.conversation.finish(result) {
            self.mark_dirty();
        } else {
            chat_warn!("chat reply arrived with no question pending; ignored");
        }
    }

    pub(crate) fn tick(&mut self) {
        if self.ingestion.tick() {
            self.mark_dirty();
        }
    }

    pub(crate) fn record_rejection(&mut self, rejection: Option<SubmitError>) {
        if self.last_rejection != rejection {
            self.last_rejection = rejection;
            self.mark_dirty();
        }
    }
}
