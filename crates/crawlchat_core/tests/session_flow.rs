//! Drives the state machine the way a front end does: effects are handed to
//! a scripted service and its replies are fed back as messages.

use std::collections::VecDeque;

use crawlchat_core::{
    update, AppState, ConversationPhase, Effect, IngestReceipt, IngestionPhase, Msg, Role,
    ServiceFailure, SessionStatus,
};

#[derive(Default)]
struct ScriptedService {
    status: VecDeque<Result<SessionStatus, ServiceFailure>>,
    ingest: VecDeque<Result<IngestReceipt, ServiceFailure>>,
    query: VecDeque<Result<String, ServiceFailure>>,
    calls: Vec<Effect>,
}

impl ScriptedService {
    fn answer(&mut self, effect: Effect) -> Msg {
        self.calls.push(effect.clone());
        match effect {
            Effect::FetchStatus => Msg::StatusLoaded(self.status.pop_front().expect("status")),
            Effect::SubmitIngest { .. } => {
                Msg::IngestFinished(self.ingest.pop_front().expect("ingest"))
            }
            Effect::SubmitQuery { .. } => {
                Msg::QueryFinished(self.query.pop_front().expect("query"))
            }
        }
    }
}

/// Dispatch `msg`, collecting effects without resolving them yet.
fn dispatch(state: AppState, msg: Msg, pending: &mut Vec<Effect>) -> AppState {
    let (state, effects) = update(state, msg);
    pending.extend(effects);
    state
}

fn settle(mut state: AppState, pending: &mut Vec<Effect>, service: &mut ScriptedService) -> AppState {
    while !pending.is_empty() {
        let effect = pending.remove(0);
        let reply = service.answer(effect);
        state = dispatch(state, reply, pending);
    }
    state
}

#[test]
fn reload_then_chat_round_trip() {
    let mut service = ScriptedService::default();
    service.status.push_back(Ok(SessionStatus {
        has_documents: true,
        crawled_url: Some("https://docs.example".to_string()),
        pages_count: Some(5),
    }));
    service
        .query
        .push_back(Ok("Answer.\n\nSources:\nhttps://docs.example/a".to_string()));

    let mut pending = Vec::new();
    let state = dispatch(AppState::new(), Msg::SessionStarted, &mut pending);
    let state = settle(state, &mut pending, &mut service);
    assert_eq!(state.view().conversation_phase, ConversationPhase::Idle);

    let state = dispatch(state, Msg::QueryInputChanged("what?".into()), &mut pending);
    let state = dispatch(state, Msg::QuerySubmitted, &mut pending);
    let state = settle(state, &mut pending, &mut service);

    assert_eq!(
        service.calls,
        vec![
            Effect::FetchStatus,
            Effect::SubmitQuery {
                query: "what?".to_string()
            }
        ]
    );
    let entries = state.conversation().log().snapshot();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[2].role(), Role::Bot);
    assert!(entries[2].rendered_content().contains("<ul><li><a href=\"https://docs.example/a\""));
}

#[test]
fn one_request_per_accepted_submission_while_reply_is_outstanding() {
    let mut service = ScriptedService::default();
    service.status.push_back(Ok(SessionStatus::default()));
    service.ingest.push_back(Ok(IngestReceipt {
        message: Some("Successfully crawled 2 pages".to_string()),
        pages_count: Some(2),
    }));

    let mut pending = Vec::new();
    let state = dispatch(AppState::new(), Msg::SessionStarted, &mut pending);
    let state = settle(state, &mut pending, &mut service);
    assert_eq!(state.view().conversation_phase, ConversationPhase::Locked);

    let mut state = dispatch(
        state,
        Msg::UrlInputChanged("https://example.com".into()),
        &mut pending,
    );
    // Hammer the submit control before the reply lands.
    for _ in 0..5 {
        state = dispatch(state, Msg::UrlSubmitted, &mut pending);
    }
    assert_eq!(pending.len(), 1);
    assert_eq!(state.view().ingestion_phase, IngestionPhase::InFlight);

    let state = settle(state, &mut pending, &mut service);
    let ingest_calls = service
        .calls
        .iter()
        .filter(|call| matches!(call, Effect::SubmitIngest { .. }))
        .count();
    assert_eq!(ingest_calls, 1);
    assert_eq!(state.view().ingestion_phase, IngestionPhase::Succeeded);
    assert_eq!(state.view().conversation_phase, ConversationPhase::Idle);
    assert_eq!(state.conversation().log().len(), 1);
}
