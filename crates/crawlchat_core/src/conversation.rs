use crate::conversation_log::{ConversationLog, Role};
use crate::service::{ServiceFailure, TRANSPORT_FAILURE_TEXT};
use crate::SubmitError;

pub const QUERY_FAILURE_FALLBACK: &str = "Sorry, something went wrong while answering.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConversationPhase {
    #[default]
    Locked,
    Idle,
    AwaitingResponse,
}

/// Chat lifecycle. Owns the conversation log; other workflows write to it
/// only through [`ConversationState::announce`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConversationState {
    phase: ConversationPhase,
    query_input: String,
    log: ConversationLog,
    wants_focus: bool,
}

impl ConversationState {
    pub fn phase(&self) -> ConversationPhase {
        self.phase
    }

    pub fn query_input(&self) -> &str {
        &self.query_input
    }

    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    pub fn controls_enabled(&self) -> bool {
        self.phase == ConversationPhase::Idle
    }

    pub fn wants_focus(&self) -> bool {
        self.wants_focus
    }

    pub(crate) fn set_query_input(&mut self, text: String) {
        self.query_input = text;
    }

    /// Locked -> Idle. Any other phase is left alone; chat never relocks.
    pub(crate) fn unlock(&mut self) -> bool {
        if self.phase == ConversationPhase::Locked {
            self.phase = ConversationPhase::Idle;
            self.wants_focus = true;
            true
        } else {
            false
        }
    }

    pub(crate) fn announce(&mut self, text: impl Into<String>) {
        self.log.append(Role::System, text);
    }

    /// Append the user's query, clear the input and start waiting.
    /// Returns the query to send.
    pub(crate) fn submit(&mut self) -> Result<String, SubmitError> {
        if self.query_input.trim().is_empty() {
            return Err(SubmitError::BlankInput);
        }
        match self.phase {
            ConversationPhase::Locked => return Err(SubmitError::Locked),
            ConversationPhase::AwaitingResponse => return Err(SubmitError::AlreadyAwaiting),
            ConversationPhase::Idle => {}
        }

        let query = std::mem::take(&mut self.query_input).trim().to_string();
        self.log.append(Role::User, query.clone());
        self.phase = ConversationPhase::AwaitingResponse;
        self.log.show_typing();
        self.wants_focus = false;
        Ok(query)
    }

    /// Apply the reply. Returns false when no query was pending.
    pub(crate) fn finish(&mut self, result: Result<String, ServiceFailure>) -> bool {
        if self.phase != ConversationPhase::AwaitingResponse {
            return false;
        }
        self.log.clear_typing();

        match result {
            Ok(response) => {
                self.log.append(Role::Bot, response);
                self.wants_focus = true;
            }
            Err(failure) => {
                let message = failure.user_message(QUERY_FAILURE_FALLBACK, TRANSPORT_FAILURE_TEXT);
                self.log.append(Role::System, format!("Error: {message}"));
            }
        }
        self.phase = ConversationPhase::Idle;
        true
    }
}
