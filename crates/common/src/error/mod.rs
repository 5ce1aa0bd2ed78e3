//! Error classification shared by every Glassbox crate
//!
//! The resilience layer never inspects concrete error types. It asks the
//! error two questions through [`ErrorClassification`]: *may this be tried
//! again?* and *must everything stop right now?* Each crate answers those
//! questions for its own error enum.
//!
//! # Error Taxonomy
//!
//! | Kind | `is_retryable` | `is_critical` | Examples |
//! |------|----------------|---------------|----------|
//! | **Transient** | `true` | `false` | Network interruption, timeout, rate limiting |
//! | **Recoverable-but-not-here** | `false` | `false` | Unparsable model output |
//! | **Permanent** | `false` | `false` | Authentication failure, invalid input |
//! | **Catastrophic** | `false` | `true` | Security violation, broken invariant |
//!
//! Circuit-open and exhaustion failures are produced by the resilience layer
//! itself and classify as permanent, so an outer `execute` never retries an
//! inner one.
//!
//! ## Implementing the trait
//!
//! ```rust,ignore
//! use glassbox_common::error::{ErrorClassification, ErrorSeverity};
//! use thiserror::Error;
//!
//! #[derive(Debug, Error)]
//! pub enum FetchError {
//!     #[error("connection reset")]
//!     Reset,
//!     #[error("forbidden")]
//!     Forbidden,
//! }
//!
//! impl ErrorClassification for FetchError {
//!     fn is_retryable(&self) -> bool {
//!         matches!(self, Self::Reset)
//!     }
//!
//!     fn severity(&self) -> ErrorSeverity {
//!         match self {
//!             Self::Reset => ErrorSeverity::Warning,
//!             Self::Forbidden => ErrorSeverity::Error,
//!         }
//!     }
//! }
//! ```

use std::fmt;
use std::time::Duration;

/// Standard interface for classifying errors by their characteristics
///
/// Only [`is_retryable`](Self::is_retryable) and
/// [`severity`](Self::severity) are required; most error types are never
/// critical and carry no retry hint.
pub trait ErrorClassification {
    /// Check if this error is retryable
    ///
    /// Retryable errors are transient issues that may succeed if attempted
    /// again, such as:
    /// - Network timeouts
    /// - Rate limiting
    /// - Temporary service unavailability
    fn is_retryable(&self) -> bool;

    /// Get the error severity level
    ///
    /// Used for monitoring, alerting, and logging decisions.
    fn severity(&self) -> ErrorSeverity;

    /// Check if this is a critical error requiring an immediate stop
    ///
    /// A critical error is never retried and aborts any remaining fallback
    /// tiers.
    fn is_critical(&self) -> bool {
        false
    }

    /// Get the suggested retry delay if applicable
    ///
    /// Returns `Some(Duration)` when the failing side asked for a specific
    /// wait (e.g. a `Retry-After` header).
    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

impl<T: ErrorClassification + ?Sized> ErrorClassification for Box<T> {
    fn is_retryable(&self) -> bool {
        (**self).is_retryable()
    }

    fn severity(&self) -> ErrorSeverity {
        (**self).severity()
    }

    fn is_critical(&self) -> bool {
        (**self).is_critical()
    }

    fn retry_after(&self) -> Option<Duration> {
        (**self).retry_after()
    }
}

/// Error severity levels for monitoring and alerting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Informational, typically for debugging
    Info,
    /// Warning, should be monitored but not critical
    Warning,
    /// Error, requires attention and action
    Error,
    /// Critical, immediate action required
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

impl ErrorClassification for std::io::Error {
    fn is_retryable(&self) -> bool {
        use std::io::ErrorKind;

        matches!(
            self.kind(),
            ErrorKind::Interrupted
                | ErrorKind::TimedOut
                | ErrorKind::WouldBlock
                | ErrorKind::ConnectionReset
                | ErrorKind::ConnectionAborted
                | ErrorKind::ConnectionRefused
                | ErrorKind::BrokenPipe
        )
    }

    fn severity(&self) -> ErrorSeverity {
        if self.is_retryable() {
            ErrorSeverity::Warning
        } else {
            ErrorSeverity::Error
        }
    }
}
