use std::fmt;

/// Successful crawl as reported by the service.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CrawlSummary {
    pub message: Option<String>,
    pub pages_count: Option<u32>,
}

/// Session state held by the service.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusReport {
    pub has_documents: bool,
    pub crawled_url: Option<String>,
    pub pages_count: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    StatusLoaded(Result<StatusReport, ServiceError>),
    CrawlCompleted(Result<CrawlSummary, ServiceError>),
    AnswerReceived(Result<String, ServiceError>),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ServiceError {
    pub kind: FailureKind,
    pub message: String,
}

impl ServiceError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub(crate) fn rejected(error: Option<String>) -> Self {
        Self::new(
            FailureKind::Rejected { error },
            "service reported success: false",
        )
    }

    /// True when the service answered with a structured `success: false`.
    pub fn is_rejection(&self) -> bool {
        matches!(self.kind, FailureKind::Rejected { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidBaseUrl,
    InvalidRequest,
    Timeout,
    Network,
    MalformedResponse { http_status: u16 },
    Rejected { error: Option<String> },
    EngineStopped,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidBaseUrl => write!(f, "invalid service url"),
            FailureKind::InvalidRequest => write!(f, "invalid request"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::MalformedResponse { http_status } => {
                write!(f, "malformed response (http status {http_status})")
            }
            FailureKind::Rejected { error: Some(error) } => write!(f, "rejected: {error}"),
            FailureKind::Rejected { error: None } => write!(f, "rejected"),
            FailureKind::EngineStopped => write!(f, "engine stopped"),
        }
    }
}
