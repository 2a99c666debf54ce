use super::*;

fn response(answer: &str) -> ChatResponse {
    ChatResponse { answer: answer.into(), references: Vec::new(), session_id: "s".into() }
}

// =============================================================
// WidgetState defaults
// =============================================================

#[test]
fn widget_state_default_idle() {
    let state = WidgetState::default();
    assert_eq!(state.status(), RequestStatus::Idle);
}

#[test]
fn widget_state_default_no_response() {
    let state = WidgetState::default();
    assert!(state.response().is_none());
    assert_eq!(state.input(), "");
}

// =============================================================
// Transitions
// =============================================================

#[test]
fn begin_request_from_idle_enters_loading() {
    let mut state = WidgetState::default();
    assert!(state.begin_request());
    assert!(state.is_loading());
}

#[test]
fn begin_request_while_loading_is_refused() {
    let mut state = WidgetState::default();
    assert!(state.begin_request());
    assert!(!state.begin_request());
    assert_eq!(state.status(), RequestStatus::Loading);
}

#[test]
fn complete_stores_response_and_idles() {
    let mut state = WidgetState::default();
    state.begin_request();
    state.complete(response("first"));
    assert_eq!(state.status(), RequestStatus::Idle);
    assert_eq!(state.response().map(|r| r.answer.as_str()), Some("first"));
}

#[test]
fn fail_clears_previous_response() {
    let mut state = WidgetState::default();
    state.begin_request();
    state.complete(response("stale"));

    state.begin_request();
    state.fail();

    assert_eq!(state.status(), RequestStatus::Error);
    assert!(state.response().is_none());
}

#[test]
fn retry_from_error_enters_loading() {
    let mut state = WidgetState::default();
    state.begin_request();
    state.fail();
    assert!(state.begin_request());
    assert!(state.is_loading());
}

#[test]
fn input_retained_across_requests() {
    let mut state = WidgetState::default();
    state.set_input("Which maps show the harbour?");
    state.begin_request();
    state.complete(response("several"));
    assert_eq!(state.input(), "Which maps show the harbour?");
}
