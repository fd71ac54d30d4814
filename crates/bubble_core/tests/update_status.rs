use std::sync::Once;

use bubble_core::{
    update, BubbleProps, BubbleState, DisplayMode, Effect, JobStatus, Msg, RECOVER_LABEL_ID,
};
use serde_json::json;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(bubble_logging::initialize_for_tests);
}

fn render(status: Option<&str>, content: &str, message: serde_json::Value, is_last: bool) -> BubbleState {
    let props = BubbleProps::from_raw(status, content, &message, is_last);
    let (state, _) = update(BubbleState::new(), Msg::PropsChanged { props, now: 0 });
    state
}

#[test]
fn created_and_running_show_only_the_running_region() {
    init_logging();
    for status in ["CREATED", "RUNNING"] {
        let view = render(Some(status), "partial", json!({"attached_messages": []}), true).view();
        assert_eq!(view.mode, DisplayMode::Running);
        assert!(view.running.is_some());
        assert!(view.done.is_none());
        assert!(view.recovery.is_none());
    }
}

#[test]
fn finished_and_failed_show_only_the_done_region() {
    init_logging();
    for status in ["FINISHED", "FAILED"] {
        let view = render(Some(status), "answer", json!({}), true).view();
        assert_eq!(view.mode, DisplayMode::Done);
        assert!(view.running.is_none());
        assert!(view.recovery.is_none());
        assert_eq!(view.done.unwrap().markdown.as_deref(), Some("answer"));
    }
}

#[test]
fn scenario_a_running_with_no_content() {
    init_logging();
    let view = render(Some("RUNNING"), "", json!({"attached_messages": []}), true).view();
    assert_eq!(view.running.unwrap().elapsed_label, "");
    assert!(view.done.is_none());
}

#[test]
fn scenario_b_finished_markdown() {
    init_logging();
    let view = render(Some("FINISHED"), "**Hello**", json!({"attached_messages": []}), true).view();
    let done = view.done.expect("done region");
    assert_eq!(done.markdown.as_deref(), Some("**Hello**"));
    assert!(done.attachments.is_empty());
    assert!(view.running.is_none());
    assert!(view.recovery.is_none());
}

#[test]
fn scenario_c_attachment_without_text() {
    init_logging();
    let view = render(Some("FINISHED"), "", json!({"attached_messages": [{"id": "a1"}]}), false).view();
    let done = view.done.expect("done region");
    assert!(done.markdown.is_none());
    assert_eq!(done.attachments.len(), 1);
    assert_eq!(done.attachments[0].key.as_str(), "a1");
    assert_eq!(done.attachments[0].artifact.record(), &json!({"id": "a1"}));
}

#[test]
fn scenario_d_stopped_last_message_offers_recovery_once_per_click() {
    init_logging();
    let state = render(Some("STOPPED"), "", json!({}), true);
    let view = state.view();
    assert_eq!(view.mode, DisplayMode::Neutral);
    assert_eq!(view.recovery.unwrap().label_id, RECOVER_LABEL_ID);

    let (state, effects) = update(state, Msg::RecoverClicked);
    assert_eq!(effects, vec![Effect::RecoverSession]);
    let (_, effects) = update(state, Msg::RecoverClicked);
    assert_eq!(effects, vec![Effect::RecoverSession]);
}

#[test]
fn scenario_e_stopped_earlier_message_has_no_footer() {
    init_logging();
    let state = render(Some("STOPPED"), "", json!({}), false);
    assert!(state.view().is_blank());

    let (_, effects) = update(state, Msg::RecoverClicked);
    assert!(effects.is_empty());
}

#[test]
fn scenario_f_missing_status_is_neutral_without_recovery() {
    init_logging();
    let view = render(None, "text", json!({}), true).view();
    assert_eq!(view.mode, DisplayMode::Neutral);
    assert!(view.is_blank());
}

#[test]
fn unknown_status_renders_nothing() {
    init_logging();
    let state = render(Some("PAUSED"), "text", json!({"attached_messages": [{"id": "x"}]}), true);
    assert_eq!(state.props().status, None);
    assert!(state.view().is_blank());
}

#[test]
fn failed_last_message_never_offers_recovery() {
    init_logging();
    let view = render(Some("FAILED"), "", json!({}), true).view();
    assert!(view.recovery.is_none());
    let done = view.done.expect("done region");
    assert!(done.is_empty());
}

#[test]
fn recovery_disappears_when_message_is_no_longer_last() {
    init_logging();
    let state = render(Some("STOPPED"), "", json!({}), true);
    let props = BubbleProps {
        status: Some(JobStatus::Stopped),
        is_last: false,
        ..BubbleProps::default()
    };
    let (state, effects) = update(state, Msg::PropsChanged { props, now: 10 });
    assert!(effects.is_empty());
    assert!(state.view().recovery.is_none());
}

#[test]
fn malformed_attachments_degrade_to_empty() {
    init_logging();
    let view = render(Some("FINISHED"), "", json!({"attached_messages": {"id": "a1"}}), true).view();
    assert!(view.done.expect("done region").attachments.is_empty());
}
