//! Time source for circuit timers
//!
//! Circuits measure `recovery_timeout` against a [`Clock`] so tests can move
//! time forward by hand instead of sleeping.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Monotonic time source read by every circuit of an executor
pub trait Clock: Send + Sync + 'static {
    /// Current monotonic instant
    fn now(&self) -> Instant;
}

/// Wall-clock backed [`Clock`] used outside tests
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

impl<T: Clock> Clock for Arc<T> {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

/// Hand-driven clock for circuit tests
///
/// Clones share one timeline: give a clone to the executor and keep another
/// to cross recovery timeouts with [`MockClock::advance`].
#[derive(Debug, Clone)]
pub struct MockClock {
    origin: Instant,
    offset: Arc<Mutex<Duration>>,
}

impl MockClock {
    pub fn new() -> Self {
        Self { origin: Instant::now(), offset: Arc::new(Mutex::new(Duration::ZERO)) }
    }

    pub fn advance(&self, by: Duration) {
        let mut offset = self.offset.lock();
        *offset = offset.saturating_add(by);
    }

    pub fn advance_secs(&self, secs: u64) {
        self.advance(Duration::from_secs(secs));
    }

    /// Total time advanced since creation
    pub fn elapsed(&self) -> Duration {
        *self.offset.lock()
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MockClock {
    fn now(&self) -> Instant {
        self.origin + self.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock;
        let first = clock.now();
        assert!(clock.now() >= first);
    }

    /// Validates that clones of a mock clock share one timeline.
    ///
    /// # Test Steps
    /// 1. Advance the original by 10s.
    /// 2. Advance a clone by 5s.
    ///
    /// Assertions:
    /// - Confirms both report 15s elapsed and `now()` moved by 15s.
    #[test]
    fn test_mock_clock_clones_share_time() {
        let clock = MockClock::new();
        let start = clock.now();
        clock.advance_secs(10);

        let handle = clock.clone();
        handle.advance(Duration::from_secs(5));

        assert_eq!(clock.elapsed(), Duration::from_secs(15));
        assert_eq!(handle.elapsed(), Duration::from_secs(15));
        assert_eq!(clock.now().duration_since(start), Duration::from_secs(15));
    }

    #[test]
    fn test_arc_clock_delegates() {
        let clock = Arc::new(MockClock::new());
        let start = clock.now();
        clock.advance_secs(1);
        assert_eq!(Clock::now(&clock).duration_since(start), Duration::from_secs(1));
    }
}
