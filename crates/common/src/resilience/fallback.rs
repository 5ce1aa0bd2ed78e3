//! Ordered fallback chain
//!
//! Fallbacks run one at a time in the order the caller listed them, each
//! bounded by `fallback_timeout`. At most `max_fallback_depth` of them are
//! tried; the rest are dropped without being invoked.

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use tracing::{debug, warn};

use super::config::ResilienceConfig;
use super::error::{ResilienceError, Tier};
use crate::error::ErrorClassification;

/// A deferred alternative operation
///
/// Nothing runs until the chain calls it, so fallbacks that are never
/// reached cost nothing.
pub type Fallback<'a, T, E> = Box<dyn FnOnce() -> BoxFuture<'a, Result<T, E>> + Send + 'a>;

/// Box a closure returning a future as a [`Fallback`]
pub fn fallback<'a, F, Fut, T, E>(operation: F) -> Fallback<'a, T, E>
where
    F: FnOnce() -> Fut + Send + 'a,
    Fut: Future<Output = Result<T, E>> + Send + 'a,
{
    Box::new(move || Box::pin(operation()))
}

/// A value together with the tier that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Served<T> {
    pub value: T,
    pub tier: Tier,
}

impl<T> Served<T> {
    pub fn into_value(self) -> T {
        self.value
    }
}

/// Runs a primary future, then fallbacks in order until one succeeds
#[derive(Debug, Clone)]
pub struct FallbackChain {
    config: Arc<ResilienceConfig>,
}

impl FallbackChain {
    pub fn new(config: Arc<ResilienceConfig>) -> Self {
        Self { config }
    }

    /// Await `primary`; on failure try each fallback in order
    ///
    /// - With no fallbacks (or a depth of zero) the primary error is
    ///   returned unchanged.
    /// - A critical primary error is returned unchanged; a critical fallback
    ///   error stops the chain with [`ResilienceError::Aborted`].
    /// - Otherwise the result is the first success, or
    ///   [`ResilienceError::AllFallbacksFailed`] with the primary error
    ///   followed by one cause per attempted fallback.
    pub async fn execute<'a, P, T, E>(
        &self,
        primary: P,
        fallbacks: Vec<Fallback<'a, T, E>>,
    ) -> Result<Served<T>, ResilienceError<E>>
    where
        P: Future<Output = Result<T, ResilienceError<E>>>,
        E: std::error::Error + ErrorClassification + Send + Sync + 'static,
    {
        let primary_error = match primary.await {
            Ok(value) => return Ok(Served { value, tier: Tier::Primary }),
            Err(error) => error,
        };

        let depth = self.config.max_fallback_depth;
        if fallbacks.is_empty() || depth == 0 || primary_error.is_critical() {
            return Err(primary_error);
        }
        if fallbacks.len() > depth {
            debug!(supplied = fallbacks.len(), depth, "fallback list truncated to max depth");
        }

        let timeout = self.config.fallback_timeout;
        let mut causes = Vec::with_capacity(fallbacks.len().min(depth) + 1);
        causes.push(primary_error);

        for (index, operation) in fallbacks.into_iter().take(depth).enumerate() {
            debug!(index, "trying fallback");

            match tokio::time::timeout(timeout, operation()).await {
                Ok(Ok(value)) => {
                    debug!(index, "fallback succeeded");
                    return Ok(Served { value, tier: Tier::Fallback(index) });
                }
                Ok(Err(source)) if source.is_critical() => {
                    warn!(index, error = %source, "critical failure in fallback, aborting chain");
                    return Err(ResilienceError::Aborted { tier: Tier::Fallback(index), source });
                }
                Ok(Err(source)) => {
                    warn!(index, error = %source, "fallback failed");
                    causes.push(ResilienceError::FallbackFailed { index, source });
                }
                Err(_) => {
                    warn!(
                        index,
                        timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                        "fallback timed out"
                    );
                    causes.push(ResilienceError::FallbackTimeout { index, after: timeout });
                }
            }
        }

        Err(ResilienceError::AllFallbacksFailed { causes })
    }
}
