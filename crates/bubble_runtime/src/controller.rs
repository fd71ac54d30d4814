use std::sync::mpsc;
use std::sync::Arc;

use bubble_core::{update, BubbleProps, BubbleState, BubbleViewModel, Effect, EpisodeId, Msg};
use bubble_logging::{bubble_error, bubble_info};

use crate::clock::Clock;
use crate::lifecycle::{EpisodeHooks, TickerLifecycle};
use crate::settings::BubbleSettings;
use crate::ticker::{TickError, TickScheduler};

pub type RecoverCallback = Box<dyn FnMut() + Send>;

/// Drives one bubble: feeds host input and ticks through the pure update
/// function and executes the resulting effects.
///
/// Ticks arrive on a channel and are applied only inside [`pump`], on the
/// owner's thread.
///
/// [`pump`]: BubbleController::pump
pub struct BubbleController {
    state: BubbleState,
    clock: Arc<dyn Clock>,
    lifecycle: TickerLifecycle,
    tick_rx: mpsc::Receiver<EpisodeId>,
    on_recover: RecoverCallback,
}

impl BubbleController {
    pub fn new(
        settings: BubbleSettings,
        clock: Arc<dyn Clock>,
        scheduler: Arc<dyn TickScheduler>,
        on_recover: impl FnMut() + Send + 'static,
    ) -> Self {
        let (tick_tx, tick_rx) = mpsc::channel();
        Self {
            state: BubbleState::new(),
            clock,
            lifecycle: TickerLifecycle::new(scheduler, settings.tick_interval, tick_tx),
            tick_rx,
            on_recover: Box::new(on_recover),
        }
    }

    pub fn state(&self) -> &BubbleState {
        &self.state
    }

    pub fn view(&self) -> BubbleViewModel {
        self.state.view()
    }

    /// Returns whether a re-render is due and clears the flag.
    pub fn take_dirty(&mut self) -> bool {
        self.state.consume_dirty()
    }

    pub fn live_episode(&self) -> Option<EpisodeId> {
        self.lifecycle.live_episode()
    }

    pub fn set_props(&mut self, props: BubbleProps) -> Result<(), TickError> {
        let now = self.clock.now_ms();
        self.dispatch(Msg::PropsChanged { props, now })
    }

    pub fn click_recover(&mut self) -> Result<(), TickError> {
        self.dispatch(Msg::RecoverClicked)
    }

    /// Applies every queued tick. Returns how many were applied.
    pub fn pump(&mut self) -> Result<usize, TickError> {
        let mut applied = 0;
        while let Ok(episode) = self.tick_rx.try_recv() {
            let now = self.clock.now_ms();
            self.dispatch(Msg::Tick { episode, now })?;
            applied += 1;
        }
        Ok(applied)
    }

    /// Tears the bubble down. Idempotent; also runs on drop.
    pub fn dispose(&mut self) {
        if let Err(err) = self.dispatch(Msg::Disposed) {
            bubble_error!("dispose failed to run effects: {}", err);
        }
        self.lifecycle.on_dispose();
        while self.tick_rx.try_recv().is_ok() {}
    }

    fn dispatch(&mut self, msg: Msg) -> Result<(), TickError> {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.run_effects(effects)
    }

    fn run_effects(&mut self, effects: Vec<Effect>) -> Result<(), TickError> {
        let mut first_error = None;
        for effect in effects {
            match effect {
                Effect::StartTicker { episode } => {
                    if let Err(err) = self.lifecycle.on_episode_start(episode) {
                        bubble_error!("could not start ticker for episode {}: {}", episode, err);
                        first_error.get_or_insert(err);
                    }
                }
                Effect::CancelTicker { episode } => self.lifecycle.on_episode_end(episode),
                Effect::RecoverSession => {
                    bubble_info!("recover session requested");
                    (self.on_recover)();
                }
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Drop for BubbleController {
    fn drop(&mut self) {
        self.dispose();
    }
}
