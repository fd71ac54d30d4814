/// Milliseconds on the host's monotonic clock.
pub type Millis = u64;

/// Identifies one continuous stay in running mode.
pub type EpisodeId = u64;

/// Interval between elapsed-time ticks.
pub const TICK_INTERVAL_MS: Millis = 1_000;

/// Elapsed-time bookkeeping for the live running episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerState {
    pub episode: EpisodeId,
    pub start_ms: Millis,
    pub elapsed_ms: Millis,
}

impl TimerState {
    pub(crate) fn start(episode: EpisodeId, now: Millis) -> Self {
        Self {
            episode,
            start_ms: now,
            elapsed_ms: 0,
        }
    }

    /// Recomputes elapsed time. Returns true when the value changed.
    pub(crate) fn tick(&mut self, now: Millis) -> bool {
        let elapsed = now.saturating_sub(self.start_ms);
        let changed = elapsed != self.elapsed_ms;
        self.elapsed_ms = elapsed;
        changed
    }
}

/// Formats elapsed time as `mm:ss`; empty until the first whole second.
pub fn format_elapsed(elapsed_ms: Millis) -> String {
    let total_secs = elapsed_ms / 1_000;
    if total_secs == 0 {
        return String::new();
    }
    let minutes = total_secs / 60;
    let seconds = total_secs % 60;
    format!("{minutes:02}:{seconds:02}")
}

#[cfg(test)]
mod tests {
    use super::{format_elapsed, TimerState};

    #[test]
    fn zero_and_sub_second_are_blank() {
        assert_eq!(format_elapsed(0), "");
        assert_eq!(format_elapsed(999), "");
    }

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_elapsed(1_000), "00:01");
        assert_eq!(format_elapsed(59_999), "00:59");
        assert_eq!(format_elapsed(61_500), "01:01");
        assert_eq!(format_elapsed(6_000_000), "100:00");
    }

    #[test]
    fn tick_tracks_distance_from_start() {
        let mut timer = TimerState::start(1, 5_000);
        assert_eq!(timer.elapsed_ms, 0);
        assert!(timer.tick(6_000));
        assert_eq!(timer.elapsed_ms, 1_000);
        assert!(!timer.tick(6_000));
    }

    #[test]
    fn tick_before_start_saturates_to_zero() {
        let mut timer = TimerState::start(1, 5_000);
        assert!(!timer.tick(4_000));
        assert_eq!(timer.elapsed_ms, 0);
    }
}
