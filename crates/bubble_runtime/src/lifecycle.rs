use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use bubble_core::EpisodeId;
use bubble_logging::{bubble_debug, bubble_warn};

use crate::ticker::{TickError, TickHandle, TickScheduler};

/// Lifecycle of the tick resource behind one bubble.
///
/// A tick is acquired on episode start and released on episode end or
/// disposal, whichever comes first.
pub trait EpisodeHooks {
    fn on_episode_start(&mut self, episode: EpisodeId) -> Result<(), TickError>;
    fn on_episode_end(&mut self, episode: EpisodeId);
    fn on_dispose(&mut self);
}

/// Keeps at most one live ticker, feeding episode ids into a channel.
pub struct TickerLifecycle {
    scheduler: Arc<dyn TickScheduler>,
    interval: Duration,
    sink: mpsc::Sender<EpisodeId>,
    live: Option<(EpisodeId, TickHandle)>,
}

impl TickerLifecycle {
    pub fn new(scheduler: Arc<dyn TickScheduler>, interval: Duration, sink: mpsc::Sender<EpisodeId>) -> Self {
        Self {
            scheduler,
            interval,
            sink,
            live: None,
        }
    }

    pub fn live_episode(&self) -> Option<EpisodeId> {
        self.live.as_ref().map(|(episode, _)| *episode)
    }

    fn release(&mut self) {
        if let Some((episode, handle)) = self.live.take() {
            bubble_debug!("releasing ticker for episode {}", episode);
            handle.cancel();
        }
    }
}

impl EpisodeHooks for TickerLifecycle {
    fn on_episode_start(&mut self, episode: EpisodeId) -> Result<(), TickError> {
        if let Some(previous) = self.live_episode() {
            bubble_warn!("episode {} started while {} still live", episode, previous);
        }
        // Never two live tickers: release before acquiring.
        self.release();

        let sink = self.sink.clone();
        let handle = self.scheduler.schedule(
            self.interval,
            Box::new(move || {
                let _ = sink.send(episode);
            }),
        )?;
        self.live = Some((episode, handle));
        Ok(())
    }

    fn on_episode_end(&mut self, episode: EpisodeId) {
        match self.live_episode() {
            Some(live) if live == episode => self.release(),
            Some(live) => bubble_warn!("end of episode {} while {} is live", episode, live),
            None => bubble_debug!("end of episode {} with no live ticker", episode),
        }
    }

    fn on_dispose(&mut self) {
        self.release();
    }
}

impl Drop for TickerLifecycle {
    fn drop(&mut self) {
        self.release();
    }
}
