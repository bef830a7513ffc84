use std::cell::Cell;
use std::time::Instant;

/// Monotonic current-time reader in milliseconds.
///
/// The absolute origin is unspecified; only differences between readings are
/// meaningful. Readings must never decrease.
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Wall-clock [`Clock`] anchored to an [`Instant`] taken at construction.
#[derive(Debug)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Manually advanced [`Clock`] for simulations and tests.
///
/// Time only moves when the test says so, which makes pacing decisions exact
/// and reproducible.
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: Cell<f64>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now_ms: Cell::new(start_ms),
        }
    }

    /// Move the clock forward by `delta_ms`.
    pub fn advance(&self, delta_ms: f64) {
        self.now_ms.set(self.now_ms.get() + delta_ms);
    }

    /// Jump the clock to an absolute reading. Must not move backwards.
    pub fn set(&self, now_ms: f64) {
        debug_assert!(now_ms >= self.now_ms.get(), "ManualClock must not rewind");
        self.now_ms.set(now_ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now_ms.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monotonic_clock_never_decreases() {
        let clock = MonotonicClock::new();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(b >= a);
    }

    #[test]
    fn manual_clock_advances_and_sets() {
        let clock = ManualClock::new(100.0);
        assert_eq!(clock.now_ms(), 100.0);
        clock.advance(33.5);
        assert_eq!(clock.now_ms(), 133.5);
        clock.set(200.0);
        assert_eq!(clock.now_ms(), 200.0);
    }
}
