use crate::{
    Banner, ConversationPhase, EntryId, IngestionPhase, MessageEntry, Progress, Role,
    SubmitError,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogRowView {
    Entry {
        id: EntryId,
        role: Role,
        /// Text as typed or received.
        raw: String,
        markup: String,
    },
    /// Pending-reply placeholder; always last, never an entry.
    Typing,
}

impl LogRowView {
    pub(crate) fn from_entry(entry: &MessageEntry) -> Self {
        LogRowView::Entry {
            id: entry.id(),
            role: entry.role(),
            raw: entry.raw_content().to_string(),
            markup: entry.rendered_content().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub ingestion_phase: IngestionPhase,
    pub conversation_phase: ConversationPhase,
    pub url_input: String,
    pub query_input: String,
    pub ingest_controls_enabled: bool,
    pub query_controls_enabled: bool,
    pub query_focused: bool,
    pub target_url: Option<String>,
    pub pages_count: Option<u32>,
    pub banner: Option<Banner>,
    pub progress: Progress,
    pub rows: Vec<LogRowView>,
    pub last_rejection: Option<SubmitError>,
    pub dirty: bool,
}

impl AppViewModel {
    pub fn is_typing(&self) -> bool {
        matches!(self.rows.last(), Some(LogRowView::Typing))
    }

    pub fn entry_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| matches!(row, LogRowView::Entry { .. }))
            .count()
    }
}
