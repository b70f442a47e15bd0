use crate::{AppState, Effect, Msg, SubmitError};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::SessionStarted => {
            if state.begin_sync() {
                vec![Effect::FetchStatus]
            } else {
                Vec::new()
            }
        }
        Msg::StatusLoaded(result) => {
            state.apply_status(result);
            Vec::new()
        }
        Msg::UrlInputChanged(text) => {
            state.set_url_input(text);
            Vec::new()
        }
        Msg::UrlSubmitted => match state.submit_ingest() {
            Ok(url) => {
                state.record_rejection(None);
                vec![Effect::SubmitIngest { url }]
            }
            Err(rejection) => {
                reject(&mut state, rejection);
                Vec::new()
            }
        },
        Msg::IngestFinished(result) => {
            state.finish_ingest(result);
            Vec::new()
        }
        Msg::QueryInputChanged(text) => {
            state.set_query_input(text);
            Vec::new()
        }
        Msg::QuerySubmitted => match state.submit_query() {
            Ok(query) => {
                state.record_rejection(None);
                vec![Effect::SubmitQuery { query }]
            }
            Err(rejection) => {
                reject(&mut state, rejection);
                Vec::new()
            }
        },
        Msg::QueryFinished(result) => {
            state.finish_query(result);
            Vec::new()
        }
        Msg::Tick => {
            state.tick();
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

// Blank input is dropped silently; the rest is surfaced as a hint.
fn reject(state: &mut AppState, rejection: SubmitError) {
    if rejection != SubmitError::BlankInput {
        state.record_rejection(Some(rejection));
    }
}
