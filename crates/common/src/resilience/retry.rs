//! Retry strategy with exponential backoff
//!
//! Attempt 0 runs immediately. Each retryable failure sleeps for the
//! calculator's delay (or the error's own `retry_after` hint, capped at
//! `max_delay`) and tries again, up to `max_retries` retries. Permanent and
//! critical failures stop at once without consuming the retry budget.
//!
//! The strategy never touches circuit state; the executor composes a circuit
//! breaker around it.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use super::backoff::DelayCalculator;
use super::config::ResilienceConfig;
use crate::error::ErrorClassification;

/// Terminal failure of a retried operation
#[derive(Debug, Error)]
pub enum RetryError<E> {
    /// Every attempt failed with a retryable error
    #[error("retries exhausted after {attempts} attempts: {source}")]
    Exhausted { attempts: u32, source: E },

    /// The operation failed with an error that must not be retried
    #[error("non-retryable failure on attempt {attempts}: {source}")]
    NonRetryable { attempts: u32, source: E },
}

impl<E> RetryError<E> {
    /// Number of times the operation was invoked
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Exhausted { attempts, .. } | Self::NonRetryable { attempts, .. } => *attempts,
        }
    }

    /// The last error returned by the operation
    pub fn into_source(self) -> E {
        match self {
            Self::Exhausted { source, .. } | Self::NonRetryable { source, .. } => source,
        }
    }
}

/// Result type for retry operations
pub type RetryResult<T, E> = Result<T, RetryError<E>>;

/// Result of a retry run plus the statistics gathered along the way
#[derive(Debug)]
pub struct RetryOutcome<T, E> {
    pub result: RetryResult<T, E>,
    pub attempts: u32,
    pub total_delay: Duration,
}

impl<T, E> RetryOutcome<T, E> {
    /// Consume the outcome and return only the result.
    pub fn into_result(self) -> RetryResult<T, E> {
        self.result
    }
}

/// Bounded retry of a single operation
#[derive(Debug, Clone)]
pub struct RetryStrategy {
    calculator: DelayCalculator,
}

impl RetryStrategy {
    pub fn new(config: Arc<ResilienceConfig>) -> Self {
        Self::with_calculator(DelayCalculator::new(config))
    }

    pub fn with_calculator(calculator: DelayCalculator) -> Self {
        Self { calculator }
    }

    pub fn config(&self) -> &ResilienceConfig {
        self.calculator.config()
    }

    pub fn calculator(&self) -> &DelayCalculator {
        &self.calculator
    }

    /// Run `operation` until it succeeds, fails permanently, or the retry
    /// budget is spent.
    pub async fn run<F, Fut, T, E>(&self, operation: F) -> RetryResult<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: ErrorClassification + fmt::Display,
    {
        self.run_with_outcome(operation).await.into_result()
    }

    /// Same as [`run`](Self::run), also reporting attempts and total sleep.
    pub async fn run_with_outcome<F, Fut, T, E>(&self, mut operation: F) -> RetryOutcome<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: ErrorClassification + fmt::Display,
    {
        let max_retries = self.config().max_retries;
        let mut attempt: u32 = 0;
        let mut total_delay = Duration::ZERO;

        loop {
            let attempts = attempt + 1;

            let error = match operation().await {
                Ok(value) => {
                    if attempt > 0 {
                        debug!(attempts, "operation succeeded after retry");
                    }
                    return RetryOutcome { result: Ok(value), attempts, total_delay };
                }
                Err(error) => error,
            };

            if !error.is_retryable() || error.is_critical() {
                debug!(attempts, error = %error, "non-retryable failure");
                return RetryOutcome {
                    result: Err(RetryError::NonRetryable { attempts, source: error }),
                    attempts,
                    total_delay,
                };
            }

            if attempt >= max_retries {
                warn!(attempts, error = %error, "retries exhausted");
                return RetryOutcome {
                    result: Err(RetryError::Exhausted { attempts, source: error }),
                    attempts,
                    total_delay,
                };
            }

            let delay = match error.retry_after() {
                Some(hint) => self.calculator.cap_hint(hint),
                None => self.calculator.compute_delay(attempt),
            };
            warn!(
                attempt = attempts,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                error = %error,
                "retryable failure, backing off"
            );

            tokio::time::sleep(delay).await;
            total_delay = total_delay.saturating_add(delay);
            attempt += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use crate::resilience::test_support::TestError;

    fn strategy(max_retries: u32) -> RetryStrategy {
        let config = ResilienceConfig::builder()
            .max_retries(max_retries)
            .base_delay(Duration::from_secs(1))
            .max_delay(Duration::from_secs(10))
            .no_jitter()
            .build()
            .unwrap();
        RetryStrategy::new(Arc::new(config))
    }

    // =========================================================================
    // Retry Budget Tests
    // =========================================================================

    /// Validates success on the first attempt without sleeping.
    ///
    /// Assertions:
    /// - Confirms one attempt and zero total delay.
    #[tokio::test(start_paused = true)]
    async fn test_retry_immediate_success() {
        let outcome = strategy(3).run_with_outcome(|| async { Ok::<_, TestError>(7) }).await;

        assert_eq!(outcome.attempts, 1);
        assert_eq!(outcome.total_delay, Duration::ZERO);
        assert_eq!(outcome.result.unwrap(), 7);
    }

    /// Validates recovery after two transient failures.
    ///
    /// Assertions:
    /// - Confirms three invocations and 1s + 2s of backoff.
    #[tokio::test(start_paused = true)]
    async fn test_retry_succeeds_after_transient_failures() {
        let calls = &AtomicU32::new(0);
        let start = tokio::time::Instant::now();

        let outcome = strategy(3)
            .run_with_outcome(move || async move {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err(TestError::Transient)
                } else {
                    Ok("done")
                }
            })
            .await;

        assert_eq!(outcome.result.unwrap(), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(outcome.total_delay, Duration::from_secs(3));
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(3) && elapsed < Duration::from_millis(3100));
    }

    /// Validates the retry budget for a permanently failing transient error.
    ///
    /// Assertions:
    /// - Confirms `max_retries + 1` invocations.
    /// - Ensures the error is `RetryError::Exhausted` with the last error.
    #[tokio::test(start_paused = true)]
    async fn test_retry_exhausts_budget() {
        let calls = &AtomicU32::new(0);

        let result = strategy(2)
            .run(move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(TestError::Transient)
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        match result {
            Err(RetryError::Exhausted { attempts, source }) => {
                assert_eq!(attempts, 3);
                assert_eq!(source, TestError::Transient);
            }
            other => panic!("expected exhaustion, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_retries_means_single_attempt() {
        let calls = &AtomicU32::new(0);

        let result = strategy(0)
            .run(move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(TestError::Transient)
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(result.unwrap_err().attempts(), 1);
    }

    /// Validates that permanent failures are not retried.
    ///
    /// Assertions:
    /// - Confirms a single invocation and no delay.
    /// - Ensures the error is `RetryError::NonRetryable`.
    #[tokio::test(start_paused = true)]
    async fn test_permanent_failure_short_circuits() {
        let calls = &AtomicU32::new(0);

        let outcome = strategy(5)
            .run_with_outcome(move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(TestError::Permanent)
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(outcome.total_delay, Duration::ZERO);
        assert!(matches!(outcome.result, Err(RetryError::NonRetryable { attempts: 1, .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_critical_failure_is_never_retried() {
        let calls = &AtomicU32::new(0);

        let result = strategy(5)
            .run(move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(TestError::Critical)
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(result.unwrap_err().into_source(), TestError::Critical);
    }

    // =========================================================================
    // Retry Hint Tests
    // =========================================================================

    /// Validates that `retry_after` hints replace the computed delay, capped
    /// at `max_delay`.
    ///
    /// Assertions:
    /// - Confirms 5s for the first hint and the 10s cap for the second.
    #[tokio::test(start_paused = true)]
    async fn test_retry_after_hint_is_capped() {
        let calls = &AtomicU32::new(0);

        let outcome = strategy(3)
            .run_with_outcome(move || async move {
                match calls.fetch_add(1, Ordering::SeqCst) {
                    0 => Err(TestError::RateLimited(Duration::from_secs(5))),
                    1 => Err(TestError::RateLimited(Duration::from_secs(600))),
                    _ => Ok(()),
                }
            })
            .await;

        assert!(outcome.result.is_ok());
        assert_eq!(outcome.attempts, 3);
        assert_eq!(outcome.total_delay, Duration::from_secs(15));
    }

    /// Validates that the accumulated delay saturates instead of overflowing.
    ///
    /// Assertions:
    /// - Confirms two `Duration::MAX` hints add up to `Duration::MAX`.
    #[tokio::test(start_paused = true)]
    async fn test_total_delay_saturates() {
        let config =
            ResilienceConfig::builder().max_retries(2).max_delay(Duration::MAX).build().unwrap();
        let calls = &AtomicU32::new(0);

        let outcome = RetryStrategy::new(Arc::new(config))
            .run_with_outcome(move || async move {
                match calls.fetch_add(1, Ordering::SeqCst) {
                    0 | 1 => Err(TestError::RateLimited(Duration::MAX)),
                    _ => Ok(()),
                }
            })
            .await;

        assert!(outcome.result.is_ok());
        assert_eq!(outcome.attempts, 3);
        assert_eq!(outcome.total_delay, Duration::MAX);
    }

    #[test]
    fn test_retry_error_display() {
        let err: RetryError<TestError> =
            RetryError::Exhausted { attempts: 4, source: TestError::Transient };
        assert_eq!(err.to_string(), "retries exhausted after 4 attempts: transient failure");

        let err: RetryError<TestError> =
            RetryError::NonRetryable { attempts: 1, source: TestError::Permanent };
        assert_eq!(err.to_string(), "non-retryable failure on attempt 1: permanent failure");
    }
}
