//! Crawlchat engine: HTTP transport to the crawl/chat service and the
//! background worker that runs requests off the UI thread.
mod client;
mod engine;
mod persist;
mod types;
mod wire;

pub use client::{CrawlLimits, ReqwestTransport, ServiceSettings, ServiceTransport};
pub use engine::{EngineEvents, EngineHandle};
pub use persist::{ensure_state_dir, PersistError, StateStore};
pub use types::{CrawlSummary, EngineEvent, FailureKind, ServiceError, StatusReport};
