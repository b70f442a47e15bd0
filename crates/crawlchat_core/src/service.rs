/// Outcome of a request that did not produce `success: true`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceFailure {
    /// Structured reply with `success: false`; the message is the server's `error`.
    Application { message: Option<String> },
    /// No structured reply at all: network error, bad body, dropped connection.
    Transport { detail: String },
}

impl ServiceFailure {
    pub fn application(message: impl Into<String>) -> Self {
        Self::Application {
            message: Some(message.into()),
        }
    }

    pub fn transport(detail: impl Into<String>) -> Self {
        Self::Transport {
            detail: detail.into(),
        }
    }

    /// Server-supplied text for application failures, `app_fallback` when the
    /// server sent none, and `transport_text` for transport failures.
    pub(crate) fn user_message(&self, app_fallback: &str, transport_text: &str) -> String {
        match self {
            ServiceFailure::Application { message: Some(text) } if !text.trim().is_empty() => {
                text.clone()
            }
            ServiceFailure::Application { .. } => app_fallback.to_string(),
            ServiceFailure::Transport { .. } => transport_text.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IngestReceipt {
    pub message: Option<String>,
    pub pages_count: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionStatus {
    pub has_documents: bool,
    pub crawled_url: Option<String>,
    pub pages_count: Option<u32>,
}

/// Shown for transport failures in both workflows.
pub const TRANSPORT_FAILURE_TEXT: &str = "Could not reach the server. Please try again.";
