//! Terminal failures surfaced by the resilient executor

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::error::{ErrorClassification, ErrorSeverity};

/// Which tier of an `execute` call produced a value or an abort
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Primary,
    /// Zero-based position in the caller's fallback list
    Fallback(usize),
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Primary => write!(f, "primary"),
            Tier::Fallback(index) => write!(f, "fallback #{index}"),
        }
    }
}

/// Errors that can occur in resilience operations
///
/// Generic over the operation error `E`, which is kept intact inside every
/// variant that wraps an operation failure.
#[derive(Debug, Error)]
pub enum ResilienceError<E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    /// The channel's circuit is open; the operation was not invoked
    #[error("circuit '{channel}' is open, next probe in {retry_in:?}")]
    CircuitOpen { channel: String, retry_in: Duration },

    /// Every retry of the primary operation failed with a retryable error
    #[error("'{channel}' failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        channel: String,
        attempts: u32,
        #[source]
        source: E,
    },

    /// The primary operation failed with a non-retryable error
    #[error("'{channel}' failed permanently on attempt {attempts}: {source}")]
    Permanent {
        channel: String,
        attempts: u32,
        #[source]
        source: E,
    },

    /// A fallback returned an error
    #[error("fallback #{index} failed: {source}")]
    FallbackFailed {
        index: usize,
        #[source]
        source: E,
    },

    /// A fallback exceeded `fallback_timeout`
    #[error("fallback #{index} timed out after {after:?}")]
    FallbackTimeout { index: usize, after: Duration },

    /// A critical failure stopped the call; no further tier was tried
    #[error("aborted at {tier} tier: {source}")]
    Aborted {
        tier: Tier,
        #[source]
        source: E,
    },

    /// The primary and every attempted fallback failed
    ///
    /// `causes` holds the primary failure first, then one entry per
    /// attempted fallback, in order.
    #[error("all {} tiers failed: {}", .causes.len(), render_causes(.causes))]
    AllFallbacksFailed { causes: Vec<ResilienceError<E>> },
}

fn render_causes<E>(causes: &[ResilienceError<E>]) -> String
where
    E: std::error::Error + Send + Sync + 'static,
{
    causes.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

/// Result type for resilience operations
pub type ResilienceResult<T, E> = Result<T, ResilienceError<E>>;

impl<E> ResilienceError<E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    /// Channel of the primary tier, when the error carries one
    pub fn channel(&self) -> Option<&str> {
        match self {
            Self::CircuitOpen { channel, .. }
            | Self::RetriesExhausted { channel, .. }
            | Self::Permanent { channel, .. } => Some(channel),
            Self::AllFallbacksFailed { causes } => causes.first().and_then(Self::channel),
            Self::FallbackFailed { .. } | Self::FallbackTimeout { .. } | Self::Aborted { .. } => {
                None
            }
        }
    }

    /// Causal chain: the aggregated causes, or this error alone
    pub fn causes(&self) -> &[Self] {
        match self {
            Self::AllFallbacksFailed { causes } => causes,
            other => std::slice::from_ref(other),
        }
    }

    /// The operation error carried by this variant, if any
    pub fn operation_error(&self) -> Option<&E> {
        match self {
            Self::RetriesExhausted { source, .. }
            | Self::Permanent { source, .. }
            | Self::FallbackFailed { source, .. }
            | Self::Aborted { source, .. } => Some(source),
            Self::CircuitOpen { .. }
            | Self::FallbackTimeout { .. }
            | Self::AllFallbacksFailed { .. } => None,
        }
    }

    pub fn is_circuit_open(&self) -> bool {
        matches!(self, Self::CircuitOpen { .. })
    }
}

impl<E> ErrorClassification for ResilienceError<E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    /// Resilience failures are terminal; retrying happened inside.
    fn is_retryable(&self) -> bool {
        false
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::CircuitOpen { .. } => ErrorSeverity::Warning,
            Self::Aborted { .. } => ErrorSeverity::Critical,
            _ => ErrorSeverity::Error,
        }
    }

    fn is_critical(&self) -> bool {
        matches!(self, Self::Aborted { .. })
    }

    fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::CircuitOpen { retry_in, .. } => Some(*retry_in),
            _ => None,
        }
    }
}
