//! Exponential backoff with additive jitter
//!
//! `delay(n) = min(base_delay * exponential_base^n, max_delay)`, then a
//! uniform jitter in `[0, delay * jitter_factor]` is added on top. Jitter is
//! only ever added, so a jittered delay never falls below the unjittered one.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::config::ResilienceConfig;

/// Source of the unit random value used for jitter
///
/// Implementations return a value in `[0.0, 1.0]`; the calculator scales it
/// by `delay * jitter_factor`.
pub trait JitterSource: Send + Sync {
    fn sample(&self) -> f64;
}

/// Jitter from the thread-local RNG (production default)
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngJitter;

impl JitterSource for ThreadRngJitter {
    fn sample(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Deterministic jitter from a seeded `StdRng`
#[derive(Debug)]
pub struct SeededJitter {
    rng: Mutex<StdRng>,
}

impl SeededJitter {
    pub fn new(seed: u64) -> Self {
        Self { rng: Mutex::new(StdRng::seed_from_u64(seed)) }
    }
}

impl JitterSource for SeededJitter {
    fn sample(&self) -> f64 {
        self.rng.lock().gen::<f64>()
    }
}

/// Always returns the same unit value, clamped to `[0.0, 1.0]`
#[derive(Debug, Clone, Copy)]
pub struct FixedJitter(f64);

impl FixedJitter {
    pub fn new(unit: f64) -> Self {
        Self(if unit.is_nan() { 0.0 } else { unit.clamp(0.0, 1.0) })
    }
}

impl JitterSource for FixedJitter {
    fn sample(&self) -> f64 {
        self.0
    }
}

/// Computes backoff delays from the shared configuration
#[derive(Clone)]
pub struct DelayCalculator {
    config: Arc<ResilienceConfig>,
    jitter: Arc<dyn JitterSource>,
}

impl fmt::Debug for DelayCalculator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelayCalculator")
            .field("base_delay", &self.config.base_delay)
            .field("max_delay", &self.config.max_delay)
            .field("exponential_base", &self.config.exponential_base)
            .field("jitter_factor", &self.config.jitter_factor)
            .finish_non_exhaustive()
    }
}

impl DelayCalculator {
    /// Calculator drawing jitter from the thread-local RNG
    pub fn new(config: Arc<ResilienceConfig>) -> Self {
        Self::with_jitter_source(config, Arc::new(ThreadRngJitter))
    }

    pub fn with_jitter_source(
        config: Arc<ResilienceConfig>,
        jitter: Arc<dyn JitterSource>,
    ) -> Self {
        Self { config, jitter }
    }

    pub fn config(&self) -> &ResilienceConfig {
        &self.config
    }

    /// Delay for `attempt` before jitter: `min(base * exp^attempt, max)`
    ///
    /// Overflowing or non-finite intermediate values saturate at `max_delay`.
    pub fn base_delay_for(&self, attempt: u32) -> Duration {
        let max = self.config.max_delay;
        if self.config.base_delay.is_zero() {
            return Duration::ZERO;
        }

        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let factor = self.config.exponential_base.powi(exponent);
        let secs = self.config.base_delay.as_secs_f64() * factor;

        Duration::try_from_secs_f64(secs).map_or(max, |delay| delay.min(max))
    }

    /// Delay to sleep after failed attempt `attempt` (zero-based)
    ///
    /// Jitter that would overflow `Duration` saturates at `Duration::MAX`.
    pub fn compute_delay(&self, attempt: u32) -> Duration {
        let delay = self.base_delay_for(attempt);
        if self.config.jitter_factor == 0.0 || delay.is_zero() {
            return delay;
        }

        let unit = self.jitter.sample().clamp(0.0, 1.0);
        let jitter_secs = delay.as_secs_f64() * self.config.jitter_factor * unit;
        delay.saturating_add(Duration::try_from_secs_f64(jitter_secs).unwrap_or(Duration::ZERO))
    }

    /// Clamp a server-provided retry hint to `max_delay`
    pub fn cap_hint(&self, hint: Duration) -> Duration {
        hint.min(self.config.max_delay)
    }
}
