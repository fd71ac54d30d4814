use bubble_logging::{bubble_debug, bubble_trace};

use crate::{classify, BubbleProps, BubbleState, DisplayMode, Effect, Millis, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: BubbleState, msg: Msg) -> (BubbleState, Vec<Effect>) {
    if state.is_disposed() {
        bubble_trace!("dropping {:?} for disposed bubble", msg);
        return (state, Vec::new());
    }

    let effects = match msg {
        Msg::PropsChanged { props, now } => apply_props(&mut state, props, now),
        Msg::Tick { episode, now } => {
            match state.timer_mut() {
                Some(timer) if timer.episode == episode => {
                    if timer.tick(now) {
                        state.mark_dirty();
                    }
                }
                _ => bubble_trace!("ignoring stale tick for episode {}", episode),
            }
            Vec::new()
        }
        Msg::RecoverClicked => {
            if state.shows_recovery() {
                vec![Effect::RecoverSession]
            } else {
                bubble_debug!("recover click ignored: control not shown");
                Vec::new()
            }
        }
        Msg::Disposed => {
            let effects = state
                .end_episode()
                .map(|episode| vec![Effect::CancelTicker { episode }])
                .unwrap_or_default();
            state.mark_disposed();
            state.mark_dirty();
            effects
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn apply_props(state: &mut BubbleState, props: BubbleProps, now: Millis) -> Vec<Effect> {
    if state.props() == &props {
        return Vec::new();
    }

    let previous = state.replace_props(props);
    state.mark_dirty();

    let was_running = classify(previous.status) == DisplayMode::Running;
    let is_running = state.mode() == DisplayMode::Running;

    match (was_running, is_running) {
        (false, true) => {
            let episode = state.begin_episode(now);
            bubble_debug!("running episode {} started at {}", episode, now);
            vec![Effect::StartTicker { episode }]
        }
        (true, false) => match state.end_episode() {
            Some(episode) => {
                bubble_debug!("running episode {} ended at {}", episode, now);
                vec![Effect::CancelTicker { episode }]
            }
            None => Vec::new(),
        },
        _ => Vec::new(),
    }
}
