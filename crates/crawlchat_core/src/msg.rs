use crate::{IngestReceipt, ServiceFailure, SessionStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Front end is up; query the service for an existing session.
    SessionStarted,
    /// Reply to the startup status query.
    StatusLoaded(Result<SessionStatus, ServiceFailure>),
    /// User edited the URL input box.
    UrlInputChanged(String),
    /// User submitted the current URL input for crawling.
    UrlSubmitted,
    /// Reply to the crawl request.
    IngestFinished(Result<IngestReceipt, ServiceFailure>),
    /// User edited the chat input box.
    QueryInputChanged(String),
    /// User sent the current chat input.
    QuerySubmitted,
    /// Reply to the chat request.
    QueryFinished(Result<String, ServiceFailure>),
    /// UI/render tick; animates the crawl indicator.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
