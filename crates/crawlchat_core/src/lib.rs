//! Crawl-and-chat core: pure session state machine, conversation log and
//! message renderer. No IO happens here; requests leave as [`Effect`]s and
//! replies come back as [`Msg`]s.
mod conversation;
mod conversation_log;
mod effect;
mod ingestion;
mod msg;
mod render;
mod service;
mod state;
mod sync;
mod update;
mod view_model;

pub use conversation::{ConversationPhase, ConversationState, QUERY_FAILURE_FALLBACK};
pub use conversation_log::{ConversationLog, EntryId, MessageEntry, Role};
pub use effect::Effect;
pub use ingestion::{
    Banner, IngestionPhase, IngestionState, Progress, INGEST_FAILURE_FALLBACK,
    INGEST_SUCCESS_FALLBACK,
};
pub use msg::Msg;
pub use render::{escape_markup, render_markup};
pub use service::{IngestReceipt, ServiceFailure, SessionStatus, TRANSPORT_FAILURE_TEXT};
pub use state::{AppState, SubmitError};
pub use sync::{SessionSync, SyncPhase};
pub use update::update;
pub use view_model::{AppViewModel, LogRowView};
