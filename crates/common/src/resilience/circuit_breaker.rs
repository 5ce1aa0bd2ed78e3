//! Per-channel circuit breaker
//!
//! State machine:
//!
//! ```text
//! CLOSED --(failure_threshold consecutive failures)--> OPEN
//! OPEN --(recovery_timeout elapsed, next call)--> HALF_OPEN
//! HALF_OPEN --(half_open_max_calls successes)--> CLOSED
//! HALF_OPEN --(any failure)--> OPEN (timer restarted)
//! ```
//!
//! All bookkeeping for one channel lives behind a single mutex, so admission
//! and outcome recording are atomic with respect to concurrent callers. The
//! operation itself runs outside the lock; CLOSED calls may overlap freely.
//!
//! Every admitted call is stamped with the circuit's generation. An outcome
//! that arrives after the circuit has moved on (opened, closed or been reset)
//! is ignored, so a straggler can neither push the failure count past the
//! threshold nor close a circuit that already reopened.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, warn};

use super::clock::{Clock, SystemClock};
use super::config::ResilienceConfig;
use crate::error::{ErrorClassification, ErrorSeverity};

/// Circuit breaker states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Circuit is closed, allowing requests
    Closed,
    /// Circuit is open, rejecting requests
    Open,
    /// Circuit is half-open, letting a bounded number of probes through
    HalfOpen,
}

impl fmt::Display for CircuitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CircuitState::Closed => write!(f, "CLOSED"),
            CircuitState::Open => write!(f, "OPEN"),
            CircuitState::HalfOpen => write!(f, "HALF_OPEN"),
        }
    }
}

/// Point-in-time copy of a circuit's state and counters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircuitSnapshot {
    pub channel: String,
    pub state: CircuitState,
    pub consecutive_failures: u32,
    pub half_open_successes: u32,
    pub half_open_in_flight: u32,
    pub opened_at: Option<Instant>,
    /// Calls admitted to the operation
    pub total_calls: u64,
    /// Admitted calls that failed
    pub total_failures: u64,
    /// Calls rejected without invoking the operation
    pub rejected_calls: u64,
}

impl fmt::Display for CircuitSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] failures={} probes_ok={} calls={} failed={} rejected={}",
            self.channel,
            self.state,
            self.consecutive_failures,
            self.half_open_successes,
            self.total_calls,
            self.total_failures,
            self.rejected_calls
        )
    }
}

/// The circuit rejected the call without invoking the operation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("circuit '{channel}' is open, next probe in {retry_in:?}")]
pub struct CircuitOpenError {
    pub channel: String,
    /// Time until the circuit will admit a probe; zero when all probe slots
    /// are taken
    pub retry_in: Duration,
}

impl ErrorClassification for CircuitOpenError {
    fn is_retryable(&self) -> bool {
        false
    }

    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Warning
    }

    fn retry_after(&self) -> Option<Duration> {
        Some(self.retry_in)
    }
}

/// Failure of a circuit-guarded call
#[derive(Debug, Error)]
pub enum CircuitError<E> {
    #[error(transparent)]
    Open(#[from] CircuitOpenError),

    #[error("{0}")]
    Failed(E),
}

#[derive(Debug)]
struct CircuitInner {
    state: CircuitState,
    generation: u64,
    consecutive_failures: u32,
    half_open_successes: u32,
    half_open_in_flight: u32,
    opened_at: Option<Instant>,
    total_calls: u64,
    total_failures: u64,
    rejected_calls: u64,
}

impl CircuitInner {
    fn new() -> Self {
        Self {
            state: CircuitState::Closed,
            generation: 0,
            consecutive_failures: 0,
            half_open_successes: 0,
            half_open_in_flight: 0,
            opened_at: None,
            total_calls: 0,
            total_failures: 0,
            rejected_calls: 0,
        }
    }

    fn transition(&mut self, state: CircuitState) {
        self.state = state;
        self.generation = self.generation.wrapping_add(1);
        self.half_open_successes = 0;
        self.half_open_in_flight = 0;
    }
}

/// Ticket for one admitted call
struct Admission<'a, C: Clock> {
    breaker: &'a CircuitBreaker<C>,
    generation: u64,
    probe: bool,
    settled: bool,
}

impl<C: Clock> Admission<'_, C> {
    fn succeed(mut self) {
        self.settled = true;
        self.breaker.on_success(self.generation, self.probe);
    }

    fn fail(mut self) {
        self.settled = true;
        self.breaker.on_failure(self.generation, self.probe);
    }
}

impl<C: Clock> Drop for Admission<'_, C> {
    fn drop(&mut self) {
        // Cancelled mid-call: free the probe slot without recording an outcome.
        if !self.settled && self.probe {
            let mut inner = self.breaker.inner.lock();
            if inner.generation == self.generation {
                inner.half_open_in_flight = inner.half_open_in_flight.saturating_sub(1);
            }
        }
    }
}

/// Circuit breaker guarding one channel
pub struct CircuitBreaker<C: Clock = SystemClock> {
    channel: String,
    config: Arc<ResilienceConfig>,
    inner: Mutex<CircuitInner>,
    clock: Arc<C>,
}

impl<C: Clock> fmt::Debug for CircuitBreaker<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CircuitBreaker")
            .field("channel", &self.channel)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl CircuitBreaker<SystemClock> {
    pub fn new(channel: impl Into<String>, config: Arc<ResilienceConfig>) -> Self {
        Self::with_clock(channel, config, SystemClock)
    }
}

impl<C: Clock> CircuitBreaker<C> {
    /// Create a circuit breaker with a custom clock (useful for testing)
    pub fn with_clock(channel: impl Into<String>, config: Arc<ResilienceConfig>, clock: C) -> Self {
        Self::with_shared_clock(channel, config, Arc::new(clock))
    }

    pub(crate) fn with_shared_clock(
        channel: impl Into<String>,
        config: Arc<ResilienceConfig>,
        clock: Arc<C>,
    ) -> Self {
        Self { channel: channel.into(), config, inner: Mutex::new(CircuitInner::new()), clock }
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Current state as last recorded
    ///
    /// An OPEN circuit whose recovery timeout has elapsed still reports OPEN
    /// here; the transition to HALF_OPEN happens on the next call.
    pub fn state(&self) -> CircuitState {
        self.inner.lock().state
    }

    pub fn snapshot(&self) -> CircuitSnapshot {
        let inner = self.inner.lock();
        CircuitSnapshot {
            channel: self.channel.clone(),
            state: inner.state,
            consecutive_failures: inner.consecutive_failures,
            half_open_successes: inner.half_open_successes,
            half_open_in_flight: inner.half_open_in_flight,
            opened_at: inner.opened_at,
            total_calls: inner.total_calls,
            total_failures: inner.total_failures,
            rejected_calls: inner.rejected_calls,
        }
    }

    /// Invoke `operation` if the circuit admits it and record the outcome
    ///
    /// Rejected calls never invoke `operation` and fail with
    /// [`CircuitError::Open`]. Every `Err` from the operation counts as a
    /// failure against the circuit.
    pub async fn call<F, Fut, T, E>(&self, operation: F) -> Result<T, CircuitError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let admission = self.admit()?;

        match operation().await {
            Ok(value) => {
                admission.succeed();
                Ok(value)
            }
            Err(error) => {
                admission.fail();
                Err(CircuitError::Failed(error))
            }
        }
    }

    /// Return the circuit to CLOSED and clear its failure counters
    pub fn reset(&self) {
        let mut inner = self.inner.lock();
        inner.transition(CircuitState::Closed);
        inner.consecutive_failures = 0;
        inner.opened_at = None;
        debug!(channel = %self.channel, "circuit manually reset to CLOSED");
    }

    fn admit(&self) -> Result<Admission<'_, C>, CircuitOpenError> {
        let mut inner = self.inner.lock();

        if inner.state == CircuitState::Open {
            let now = self.clock.now();
            let elapsed =
                inner.opened_at.map_or(Duration::MAX, |at| now.saturating_duration_since(at));

            if elapsed < self.config.recovery_timeout {
                inner.rejected_calls += 1;
                debug!(channel = %self.channel, state = %inner.state, "circuit rejecting call");
                return Err(CircuitOpenError {
                    channel: self.channel.clone(),
                    retry_in: self.config.recovery_timeout - elapsed,
                });
            }

            inner.transition(CircuitState::HalfOpen);
            debug!(channel = %self.channel, "recovery timeout elapsed, circuit HALF_OPEN");
        }

        let probe = inner.state == CircuitState::HalfOpen;
        if probe {
            if inner.half_open_in_flight >= self.config.half_open_max_calls {
                inner.rejected_calls += 1;
                debug!(channel = %self.channel, "all probe slots busy, rejecting call");
                return Err(CircuitOpenError {
                    channel: self.channel.clone(),
                    retry_in: Duration::ZERO,
                });
            }
            inner.half_open_in_flight += 1;
        }

        inner.total_calls += 1;
        Ok(Admission { breaker: self, generation: inner.generation, probe, settled: false })
    }

    fn on_success(&self, generation: u64, probe: bool) {
        let mut inner = self.inner.lock();
        if inner.generation != generation {
            return;
        }

        match inner.state {
            CircuitState::Closed => inner.consecutive_failures = 0,
            CircuitState::HalfOpen if probe => {
                inner.half_open_in_flight = inner.half_open_in_flight.saturating_sub(1);
                inner.half_open_successes += 1;
                if inner.half_open_successes >= self.config.half_open_max_calls {
                    let successes = inner.half_open_successes;
                    inner.transition(CircuitState::Closed);
                    inner.consecutive_failures = 0;
                    inner.opened_at = None;
                    debug!(
                        channel = %self.channel,
                        successes,
                        "circuit CLOSED after successful probes"
                    );
                }
            }
            CircuitState::HalfOpen | CircuitState::Open => {}
        }
    }

    fn on_failure(&self, generation: u64, probe: bool) {
        let mut inner = self.inner.lock();
        if inner.generation != generation {
            return;
        }
        inner.total_failures += 1;

        match inner.state {
            CircuitState::Closed => {
                inner.consecutive_failures += 1;
                if inner.consecutive_failures >= self.config.failure_threshold {
                    let failures = inner.consecutive_failures;
                    self.open(&mut inner);
                    warn!(channel = %self.channel, failures, "circuit OPEN");
                }
            }
            CircuitState::HalfOpen if probe => {
                self.open(&mut inner);
                warn!(channel = %self.channel, "probe failed, circuit OPEN again");
            }
            CircuitState::HalfOpen | CircuitState::Open => {}
        }
    }

    fn open(&self, inner: &mut CircuitInner) {
        inner.transition(CircuitState::Open);
        inner.opened_at = Some(self.clock.now());
    }
}
