use std::collections::BTreeMap;
use std::io;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use bubble_logging::{bubble_trace, bubble_warn};
use thiserror::Error;

pub type TickCallback = Box<dyn Fn() + Send + 'static>;

#[derive(Debug, Error)]
pub enum TickError {
    #[error("failed to spawn ticker thread: {0}")]
    Spawn(#[from] io::Error),
    #[error("ticker unavailable: {0}")]
    Unavailable(String),
}

/// Schedules a recurring callback until the returned handle is dropped.
pub trait TickScheduler: Send + Sync {
    fn schedule(&self, interval: Duration, on_tick: TickCallback) -> Result<TickHandle, TickError>;
}

/// Live recurring tick. Dropping it cancels the tick.
pub struct TickHandle {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl TickHandle {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for TickHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TickHandle")
            .field("live", &self.cancel.is_some())
            .finish()
    }
}

/// One background thread per live tick.
///
/// Cancelling joins the thread, so no callback runs after the handle is gone.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadTickScheduler;

impl TickScheduler for ThreadTickScheduler {
    fn schedule(&self, interval: Duration, on_tick: TickCallback) -> Result<TickHandle, TickError> {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let worker = thread::Builder::new()
            .name("bubble-ticker".to_string())
            .spawn(move || loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => on_tick(),
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            })?;

        Ok(TickHandle::new(move || {
            drop(stop_tx);
            if worker.thread().id() == thread::current().id() {
                bubble_warn!("ticker cancelled from its own thread; not joining");
                return;
            }
            if worker.join().is_err() {
                bubble_warn!("ticker thread panicked");
            }
        }))
    }
}

struct ManualEntry {
    interval: Duration,
    on_tick: TickCallback,
}

#[derive(Default)]
struct ManualInner {
    next_id: u64,
    live: BTreeMap<u64, ManualEntry>,
    unavailable: Option<String>,
}

/// Scheduler driven by hand, for deterministic tests and replays.
#[derive(Clone, Default)]
pub struct ManualTickScheduler {
    inner: Arc<Mutex<ManualInner>>,
}

impl ManualTickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later `schedule` call fail with `reason`.
    pub fn set_unavailable(&self, reason: impl Into<String>) {
        self.lock().unavailable = Some(reason.into());
    }

    /// Fires every live tick once, in scheduling order. Returns how many fired.
    pub fn fire_all(&self) -> usize {
        let inner = self.lock();
        for entry in inner.live.values() {
            (entry.on_tick)();
        }
        inner.live.len()
    }

    pub fn live_count(&self) -> usize {
        self.lock().live.len()
    }

    pub fn live_intervals(&self) -> Vec<Duration> {
        self.lock().live.values().map(|e| e.interval).collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ManualInner> {
        // A panicking test callback must not wedge the other handles.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TickScheduler for ManualTickScheduler {
    fn schedule(&self, interval: Duration, on_tick: TickCallback) -> Result<TickHandle, TickError> {
        let mut inner = self.lock();
        if let Some(reason) = &inner.unavailable {
            return Err(TickError::Unavailable(reason.clone()));
        }
        inner.next_id += 1;
        let id = inner.next_id;
        inner.live.insert(id, ManualEntry { interval, on_tick });
        bubble_trace!("manual tick {} scheduled every {:?}", id, interval);

        let weak = Arc::downgrade(&self.inner);
        Ok(TickHandle::new(move || {
            if let Some(inner) = weak.upgrade() {
                let mut inner = inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                inner.live.remove(&id);
            }
        }))
    }
}
