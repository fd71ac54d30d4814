use bubble_core::{update, BubbleState, Msg};

#[test]
fn update_is_noop() {
    let state = BubbleState::new();
    let (next, effects) = update(state.clone(), Msg::NoOp);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}

#[test]
fn fresh_bubble_is_blank_and_neutral() {
    let view = BubbleState::new().view();
    assert!(view.is_blank());
    assert!(view.running.is_none());
    assert!(view.done.is_none());
    assert!(view.recovery.is_none());
}
