//! Resilient executor: circuit breaker → retry → fallback chain
//!
//! The executor owns one circuit per channel name, created lazily on first
//! use. A call runs
//! `circuit(channel).call(retry.run(operation))`, and when that fails
//! terminally the caller's fallbacks are tried in order. Fallbacks are not
//! wrapped in circuits or retries; a fallback that wants them calls
//! [`ResilientExecutor::execute`] itself on its own channel.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, instrument};

use super::backoff::{DelayCalculator, JitterSource};
use super::circuit_breaker::{CircuitBreaker, CircuitError, CircuitSnapshot};
use super::clock::{Clock, SystemClock};
use super::config::{ConfigResult, ResilienceConfig};
use super::error::{ResilienceError, Tier};
use super::fallback::{Fallback, FallbackChain, Served};
use super::retry::{RetryError, RetryStrategy};
use crate::error::ErrorClassification;

/// Facade composing circuit breaking, retry and fallback per channel
pub struct ResilientExecutor<C: Clock = SystemClock> {
    config: Arc<ResilienceConfig>,
    retry: RetryStrategy,
    fallbacks: FallbackChain,
    circuits: DashMap<String, Arc<CircuitBreaker<C>>>,
    clock: Arc<C>,
}

impl<C: Clock> fmt::Debug for ResilientExecutor<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResilientExecutor")
            .field("config", &self.config)
            .field("channels", &self.circuits.len())
            .finish_non_exhaustive()
    }
}

impl ResilientExecutor<SystemClock> {
    /// # Errors
    /// Returns `ConfigError::Invalid` when `config` fails validation.
    pub fn new(config: ResilienceConfig) -> ConfigResult<Self> {
        Self::with_clock(config, SystemClock)
    }
}

impl Default for ResilientExecutor<SystemClock> {
    fn default() -> Self {
        Self::assemble(ResilienceConfig::default(), SystemClock)
    }
}

impl<C: Clock> ResilientExecutor<C> {
    /// Create an executor whose circuits read time from `clock`
    ///
    /// # Errors
    /// Returns `ConfigError::Invalid` when `config` fails validation, so a
    /// config built as a struct literal gets the same checks as the builder.
    pub fn with_clock(config: ResilienceConfig, clock: C) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self::assemble(config, clock))
    }

    fn assemble(config: ResilienceConfig, clock: C) -> Self {
        let config = Arc::new(config);
        Self {
            retry: RetryStrategy::new(Arc::clone(&config)),
            fallbacks: FallbackChain::new(Arc::clone(&config)),
            circuits: DashMap::new(),
            clock: Arc::new(clock),
            config,
        }
    }

    /// Replace the jitter source used between retries
    #[must_use]
    pub fn with_jitter_source(mut self, jitter: Arc<dyn JitterSource>) -> Self {
        let calculator = DelayCalculator::with_jitter_source(Arc::clone(&self.config), jitter);
        self.retry = RetryStrategy::with_calculator(calculator);
        self
    }

    pub fn config(&self) -> &ResilienceConfig {
        &self.config
    }

    /// The circuit guarding `channel`, created on first use
    pub fn circuit(&self, channel: &str) -> Arc<CircuitBreaker<C>> {
        if let Some(existing) = self.circuits.get(channel) {
            return Arc::clone(existing.value());
        }

        let entry = self.circuits.entry(channel.to_owned()).or_insert_with(|| {
            debug!(channel, "creating circuit");
            Arc::new(CircuitBreaker::with_shared_clock(
                channel,
                Arc::clone(&self.config),
                Arc::clone(&self.clock),
            ))
        });
        Arc::clone(entry.value())
    }

    /// Names of every channel seen so far, sorted
    pub fn channels(&self) -> Vec<String> {
        let mut names: Vec<String> =
            self.circuits.iter().map(|entry| entry.key().clone()).collect();
        names.sort();
        names
    }

    /// Snapshots of every circuit, sorted by channel
    pub fn snapshots(&self) -> Vec<CircuitSnapshot> {
        let mut snapshots: Vec<CircuitSnapshot> =
            self.circuits.iter().map(|entry| entry.value().snapshot()).collect();
        snapshots.sort_by(|a, b| a.channel.cmp(&b.channel));
        snapshots
    }

    /// Run `operation` on `channel` with circuit breaking and retries
    pub async fn execute<F, Fut, T, E>(
        &self,
        channel: &str,
        operation: F,
    ) -> Result<T, ResilienceError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::error::Error + ErrorClassification + Send + Sync + 'static,
    {
        self.run_primary(channel, operation).await
    }

    /// Like [`execute`](Self::execute), then try `fallbacks` in order
    pub async fn execute_with_fallbacks<'a, F, Fut, T, E>(
        &self,
        channel: &str,
        operation: F,
        fallbacks: Vec<Fallback<'a, T, E>>,
    ) -> Result<T, ResilienceError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::error::Error + ErrorClassification + Send + Sync + 'static,
    {
        self.execute_detailed(channel, operation, fallbacks).await.map(Served::into_value)
    }

    /// Like [`execute_with_fallbacks`](Self::execute_with_fallbacks), also
    /// reporting which tier produced the value
    #[instrument(
        level = "debug",
        skip_all,
        fields(channel = %channel, fallbacks = fallbacks.len())
    )]
    pub async fn execute_detailed<'a, F, Fut, T, E>(
        &self,
        channel: &str,
        operation: F,
        fallbacks: Vec<Fallback<'a, T, E>>,
    ) -> Result<Served<T>, ResilienceError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::error::Error + ErrorClassification + Send + Sync + 'static,
    {
        self.fallbacks.execute(self.run_primary(channel, operation), fallbacks).await
    }

    async fn run_primary<F, Fut, T, E>(
        &self,
        channel: &str,
        operation: F,
    ) -> Result<T, ResilienceError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::error::Error + ErrorClassification + Send + Sync + 'static,
    {
        let circuit = self.circuit(channel);

        match circuit.call(|| self.retry.run(operation)).await {
            Ok(value) => Ok(value),
            Err(CircuitError::Open(open)) => {
                Err(ResilienceError::CircuitOpen { channel: open.channel, retry_in: open.retry_in })
            }
            Err(CircuitError::Failed(RetryError::Exhausted { attempts, source })) => {
                Err(ResilienceError::RetriesExhausted {
                    channel: channel.to_owned(),
                    attempts,
                    source,
                })
            }
            Err(CircuitError::Failed(RetryError::NonRetryable { source, .. }))
                if source.is_critical() =>
            {
                Err(ResilienceError::Aborted { tier: Tier::Primary, source })
            }
            Err(CircuitError::Failed(RetryError::NonRetryable { attempts, source })) => {
                Err(ResilienceError::Permanent { channel: channel.to_owned(), attempts, source })
            }
        }
    }
}
