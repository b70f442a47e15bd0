use std::sync::Once;

use crawlchat_core::{
    update, AppState, ConversationPhase, Effect, IngestReceipt, LogRowView, Msg, Role,
    ServiceFailure, SubmitError, QUERY_FAILURE_FALLBACK, TRANSPORT_FAILURE_TEXT,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(crawlchat_logging::initialize_for_tests);
}

/// State with a finished crawl, so chat is unlocked and the log holds one
/// system announcement.
fn unlocked() -> AppState {
    let (state, _) = update(
        AppState::new(),
        Msg::UrlInputChanged("https://example.com".to_string()),
    );
    let (state, _) = update(state, Msg::UrlSubmitted);
    let (mut state, _) = update(
        state,
        Msg::IngestFinished(Ok(IngestReceipt {
            message: Some("ok".to_string()),
            pages_count: Some(3),
        })),
    );
    state.consume_dirty();
    state
}

fn ask(state: AppState, query: &str) -> (AppState, Vec<Effect>) {
    let (state, _) = update(state, Msg::QueryInputChanged(query.to_string()));
    update(state, Msg::QuerySubmitted)
}

fn roles(state: &AppState) -> Vec<Role> {
    state
        .conversation()
        .log()
        .snapshot()
        .iter()
        .map(|entry| entry.role())
        .collect()
}

#[test]
fn chat_is_locked_until_a_corpus_exists() {
    init_logging();
    let (state, effects) = ask(AppState::new(), "hello?");

    assert!(effects.is_empty());
    assert_eq!(state.view().conversation_phase, ConversationPhase::Locked);
    assert!(!state.view().query_controls_enabled);
    assert!(state.conversation().log().is_empty());
    assert_eq!(state.view().last_rejection, Some(SubmitError::Locked));
}

#[test]
fn submit_appends_user_entry_clears_input_and_shows_typing() {
    init_logging();
    let (state, effects) = ask(unlocked(), "what is this about?");
    let view = state.view();

    assert_eq!(
        effects,
        vec![Effect::SubmitQuery {
            query: "what is this about?".to_string()
        }]
    );
    assert_eq!(view.conversation_phase, ConversationPhase::AwaitingResponse);
    assert!(!view.query_controls_enabled);
    assert_eq!(view.query_input, "");
    assert!(view.is_typing());
    assert_eq!(
        view.rows.iter().filter(|row| **row == LogRowView::Typing).count(),
        1
    );
    assert_eq!(roles(&state), vec![Role::System, Role::User]);
}

#[test]
fn whitespace_query_is_a_silent_noop() {
    init_logging();
    let state = unlocked();
    let before = state.conversation().log().len();

    let (mut state, effects) = ask(state, "   ");

    assert!(effects.is_empty());
    assert_eq!(state.conversation().log().len(), before);
    assert_eq!(state.view().query_input, "   ");
    assert_eq!(state.view().last_rejection, None);
    assert_eq!(state.view().conversation_phase, ConversationPhase::Idle);
    // Only the input edit changed anything.
    assert!(state.consume_dirty());
    let (mut state, effects) = update(state, Msg::QuerySubmitted);
    assert!(effects.is_empty());
    assert!(!state.consume_dirty());
}

#[test]
fn second_query_while_awaiting_is_rejected() {
    init_logging();
    let (state, _) = ask(unlocked(), "first");
    let (state, effects) = ask(state, "second");

    assert!(effects.is_empty());
    assert_eq!(state.view().last_rejection, Some(SubmitError::AlreadyAwaiting));
    assert_eq!(state.view().query_input, "second");
    assert_eq!(roles(&state), vec![Role::System, Role::User]);
}

#[test]
fn reply_replaces_typing_with_bot_entry() {
    init_logging();
    let (state, _) = ask(unlocked(), "what is this about?");
    let (state, effects) = update(
        state,
        Msg::QueryFinished(Ok("It is about https://example.com".to_string())),
    );
    let view = state.view();

    assert!(effects.is_empty());
    assert!(!view.is_typing());
    assert_eq!(view.conversation_phase, ConversationPhase::Idle);
    assert!(view.query_controls_enabled);
    assert!(view.query_focused);
    assert_eq!(roles(&state), vec![Role::System, Role::User, Role::Bot]);

    let bot = &state.conversation().log().snapshot()[2];
    assert_eq!(bot.raw_content(), "It is about https://example.com");
    assert!(bot.rendered_content().contains(r#"<a href="https://example.com""#));
}

#[test]
fn application_failure_appends_system_error_after_user_entry() {
    init_logging();
    let (state, _) = ask(unlocked(), "what is this about?");
    let (state, _) = update(
        state,
        Msg::QueryFinished(Err(ServiceFailure::application("no index"))),
    );

    let entries = state.conversation().log().snapshot();
    let user_then_system: Vec<_> = entries[1..].iter().map(|e| e.role()).collect();
    assert_eq!(user_then_system, vec![Role::User, Role::System]);
    assert_eq!(entries[1].raw_content(), "what is this about?");
    assert!(entries[2].raw_content().contains("no index"));
    assert!(!state.view().is_typing());
    assert_eq!(state.view().conversation_phase, ConversationPhase::Idle);
}

#[test]
fn failures_without_server_text_use_generic_messages() {
    init_logging();
    let (state, _) = ask(unlocked(), "one");
    let (state, _) = update(
        state,
        Msg::QueryFinished(Err(ServiceFailure::Application { message: None })),
    );
    let (state, _) = ask(state, "two");
    let (state, _) = update(
        state,
        Msg::QueryFinished(Err(ServiceFailure::transport("reset by peer"))),
    );

    let entries = state.conversation().log().snapshot();
    assert_eq!(
        entries[2].raw_content(),
        format!("Error: {QUERY_FAILURE_FALLBACK}")
    );
    assert_eq!(
        entries[4].raw_content(),
        format!("Error: {TRANSPORT_FAILURE_TEXT}")
    );
    assert!(!entries[4].raw_content().contains("reset by peer"));
}

#[test]
fn user_text_is_escaped_but_never_linkified() {
    init_logging();
    let (state, _) = ask(unlocked(), "<b>see</b> https://example.com");

    let user = &state.conversation().log().snapshot()[1];
    assert_eq!(
        user.rendered_content(),
        "&lt;b&gt;see&lt;/b&gt; https://example.com"
    );
}

#[test]
fn exchanges_never_interleave() {
    init_logging();
    let mut state = unlocked();
    for (question, answer) in [("q1", "a1"), ("q2", "a2"), ("q3", "a3")] {
        let (next, _) = ask(state, question);
        let (next, rejected) = ask(next, "interloper");
        assert!(rejected.is_empty());
        let (next, _) = update(next, Msg::QueryInputChanged(String::new()));
        let (next, _) = update(next, Msg::QueryFinished(Ok(answer.to_string())));
        state = next;
    }

    let contents: Vec<_> = state
        .conversation()
        .log()
        .snapshot()
        .iter()
        .skip(1)
        .map(|entry| entry.raw_content().to_string())
        .collect();
    assert_eq!(contents, vec!["q1", "a1", "q2", "a2", "q3", "a3"]);
}

#[test]
fn stray_reply_is_ignored() {
    init_logging();
    let state = unlocked();
    let (mut state, _) = update(state, Msg::QueryFinished(Ok("late".to_string())));

    assert_eq!(state.conversation().log().len(), 1);
    assert!(!state.consume_dirty());
}

#[test]
fn ingestion_and_chat_run_side_by_side() {
    init_logging();
    let (state, _) = ask(unlocked(), "question");
    let (state, crawl) = update(state, Msg::UrlSubmitted);

    assert_eq!(crawl.len(), 1);
    let (state, _) = update(state, Msg::QueryFinished(Ok("answer".to_string())));
    let (state, _) = update(
        state,
        Msg::IngestFinished(Err(ServiceFailure::transport("down"))),
    );

    assert_eq!(state.view().conversation_phase, ConversationPhase::Idle);
    assert_eq!(
        roles(&state),
        vec![Role::System, Role::User, Role::Bot]
    );
}
