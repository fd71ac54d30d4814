use std::time::Duration;

use bubble_core::TICK_INTERVAL_MS;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BubbleSettings {
    pub tick_interval: Duration,
}

impl Default for BubbleSettings {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(TICK_INTERVAL_MS),
        }
    }
}
