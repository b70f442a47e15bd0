use crate::service::{ServiceFailure, SessionStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncPhase {
    #[default]
    NotStarted,
    Pending,
    Done,
}

/// Tracks the one status query made when the session starts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionSync {
    phase: SyncPhase,
}

impl SessionSync {
    pub fn phase(&self) -> SyncPhase {
        self.phase
    }

    /// True only the first time; later calls are ignored.
    pub(crate) fn begin(&mut self) -> bool {
        if self.phase == SyncPhase::NotStarted {
            self.phase = SyncPhase::Pending;
            true
        } else {
            false
        }
    }

    /// Resolve the pending query. Transport failures resolve to `None`:
    /// the session stays as it was and nothing is reported.
    pub(crate) fn resolve(
        &mut self,
        result: Result<SessionStatus, ServiceFailure>,
    ) -> Option<SessionStatus> {
        if self.phase != SyncPhase::Pending {
            return None;
        }
        self.phase = SyncPhase::Done;
        result.ok().filter(|status| status.has_documents)
    }
}
