//! Fixed-interval timers advanced by simulated time.

use std::time::Duration;

/// Interval timer that converts elapsed simulated time into whole firings.
///
/// Systems that poll on their own cadence (enemy AI, respawn checks, mission
/// polling) share this type so that their behaviour depends only on the
/// durations carried by `Event::TimeAdvanced` and never on wall-clock
/// callbacks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cadence {
    interval: Duration,
    accumulator: Duration,
}

impl Cadence {
    /// Creates a cadence that fires once every `interval` of simulated time.
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            accumulator: Duration::ZERO,
        }
    }

    /// Interval between two consecutive firings.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Simulated time accumulated toward the next firing.
    #[must_use]
    pub const fn pending(&self) -> Duration {
        self.accumulator
    }

    /// Accumulates `dt` and returns how many firings became due.
    ///
    /// A zero interval never fires.
    pub fn advance(&mut self, dt: Duration) -> u32 {
        if self.interval.is_zero() {
            return 0;
        }

        let total = self.accumulator.saturating_add(dt).as_nanos();
        let interval = self.interval.as_nanos();
        self.accumulator = from_nanos(total % interval);
        u32::try_from(total / interval).unwrap_or(u32::MAX)
    }

    /// Discards any partially accumulated time.
    pub fn reset(&mut self) {
        self.accumulator = Duration::ZERO;
    }
}

fn from_nanos(nanos: u128) -> Duration {
    const NANOS_PER_SEC: u128 = 1_000_000_000;
    let secs = u64::try_from(nanos / NANOS_PER_SEC).unwrap_or(u64::MAX);
    // Always below one second, so the cast is lossless.
    let subsec = (nanos % NANOS_PER_SEC) as u32;
    Duration::new(secs, subsec)
}
