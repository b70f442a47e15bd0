use crate::service::{IngestReceipt, ServiceFailure, TRANSPORT_FAILURE_TEXT};
use crate::SubmitError;

pub const INGEST_SUCCESS_FALLBACK: &str = "Website crawled successfully.";
pub const INGEST_FAILURE_FALLBACK: &str = "Crawling failed. Please check the URL and try again.";

const TICKS_BEFORE_PERCENT: u32 = 4;
const PERCENT_START: u8 = 10;
const PERCENT_CEILING: u8 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IngestionPhase {
    #[default]
    Idle,
    InFlight,
    Succeeded,
    Failed,
}

/// Illustrative crawl indicator; it acknowledges the request, it does not measure it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Progress {
    #[default]
    Hidden,
    Indeterminate,
    Percent(u8),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Banner {
    Success(String),
    Error(String),
}

/// What a finished ingestion asks of the rest of the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum IngestCompletion {
    Ready { url: String },
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IngestionState {
    phase: IngestionPhase,
    url_input: String,
    target_url: Option<String>,
    pages_count: Option<u32>,
    banner: Option<Banner>,
    progress: Progress,
    ticks_in_flight: u32,
}

impl IngestionState {
    pub fn phase(&self) -> IngestionPhase {
        self.phase
    }

    pub fn url_input(&self) -> &str {
        &self.url_input
    }

    pub fn target_url(&self) -> Option<&str> {
        self.target_url.as_deref()
    }

    pub fn pages_count(&self) -> Option<u32> {
        self.pages_count
    }

    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    pub fn progress(&self) -> Progress {
        self.progress
    }

    pub fn controls_enabled(&self) -> bool {
        self.phase != IngestionPhase::InFlight
    }

    pub(crate) fn set_url_input(&mut self, text: String) {
        self.url_input = text;
    }

    /// Accept a submission of the current URL input and move to `InFlight`.
    ///
    /// The URL itself is not validated here; the service decides.
    pub(crate) fn submit(&mut self) -> Result<String, SubmitError> {
        if self.phase == IngestionPhase::InFlight {
            return Err(SubmitError::AlreadyInFlight);
        }
        let url = self.url_input.trim();
        if url.is_empty() {
            return Err(SubmitError::BlankInput);
        }
        let url = url.to_string();

        self.phase = IngestionPhase::InFlight;
        self.target_url = Some(url.clone());
        self.pages_count = None;
        self.banner = None;
        self.progress = Progress::Indeterminate;
        self.ticks_in_flight = 0;
        Ok(url)
    }

    /// Apply the service reply. Returns `None` when nothing was in flight.
    pub(crate) fn finish(
        &mut self,
        result: Result<IngestReceipt, ServiceFailure>,
    ) -> Option<IngestCompletion> {
        if self.phase != IngestionPhase::InFlight {
            return None;
        }
        self.ticks_in_flight = 0;

        match result {
            Ok(receipt) => {
                let message = receipt
                    .message
                    .filter(|text| !text.trim().is_empty())
                    .unwrap_or_else(|| INGEST_SUCCESS_FALLBACK.to_string());
                self.phase = IngestionPhase::Succeeded;
                self.pages_count = receipt.pages_count;
                self.banner = Some(Banner::Success(message));
                self.progress = Progress::Percent(100);
                let url = self.target_url.clone().unwrap_or_default();
                Some(IngestCompletion::Ready { url })
            }
            Err(failure) => {
                let message =
                    failure.user_message(INGEST_FAILURE_FALLBACK, TRANSPORT_FAILURE_TEXT);
                self.phase = IngestionPhase::Failed;
                self.banner = Some(Banner::Error(message));
                self.progress = Progress::Hidden;
                Some(IngestCompletion::Failed)
            }
        }
    }

    /// Summary of a crawl done before this session started.
    pub(crate) fn restore_summary(&mut self, url: String, pages_count: Option<u32>) {
        let summary = match pages_count {
            Some(count) => format!("Previously crawled {url} ({count} pages)."),
            None => format!("Previously crawled {url}."),
        };
        self.target_url = Some(url);
        self.pages_count = pages_count;
        self.banner = Some(Banner::Success(summary));
    }

    /// Advance the indicator. Returns true when it changed.
    pub(crate) fn tick(&mut self) -> bool {
        if self.phase != IngestionPhase::InFlight {
            return false;
        }
        self.ticks_in_flight += 1;
        let next = match self.progress {
            Progress::Indeterminate if self.ticks_in_flight >= TICKS_BEFORE_PERCENT => {
                Progress::Percent(PERCENT_START)
            }
            Progress::Percent(p) if p < PERCENT_CEILING => {
                let step = ((PERCENT_CEILING - p) / 10).max(1);
                Progress::Percent((p + step).min(PERCENT_CEILING))
            }
            other => other,
        };
        let changed = next != self.progress;
        self.progress = next;
        changed
    }
}
