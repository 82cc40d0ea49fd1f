#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Fixed-cadence tick clock that turns wall-clock frames into simulation ticks.

use std::time::Duration;

/// Longest frame credited to the clock. Longer frames are truncated so a
/// stalled host does not owe a burst of catch-up ticks.
pub const MAX_FRAME: Duration = Duration::from_millis(100);

/// Accumulates frame time and reports how many ticks are owed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickClock {
    accumulator: Duration,
}

impl TickClock {
    /// Creates a clock with nothing accumulated.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            accumulator: Duration::ZERO,
        }
    }

    /// Time carried toward the next tick.
    #[must_use]
    pub const fn accumulated(&self) -> Duration {
        self.accumulator
    }

    /// Credits one frame of `elapsed` time and returns the number of ticks of
    /// `tick_refresh_rate` that are now due. The remainder carries over.
    pub fn advance(&mut self, elapsed: Duration, tick_refresh_rate: Duration) -> u32 {
        if tick_refresh_rate.is_zero() {
            return 0;
        }

        self.accumulator = self.accumulator.saturating_add(elapsed.min(MAX_FRAME));
        let mut ticks = 0;
        while self.accumulator >= tick_refresh_rate {
            self.accumulator -= tick_refresh_rate;
            ticks += 1;
        }
        ticks
    }

    /// Drops any carried time.
    pub fn reset(&mut self) {
        self.accumulator = Duration::ZERO;
    }
}
