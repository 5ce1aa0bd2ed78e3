//! Error fixture shared by the resilience unit tests

use std::time::Duration;

use thiserror::Error;

use crate::error::{ErrorClassification, ErrorSeverity};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum TestError {
    #[error("transient failure")]
    Transient,
    #[error("permanent failure")]
    Permanent,
    #[error("catastrophic failure")]
    Critical,
    #[error("rate limited")]
    RateLimited(Duration),
}

impl ErrorClassification for TestError {
    fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient | Self::RateLimited(_))
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Transient | Self::RateLimited(_) => ErrorSeverity::Warning,
            Self::Permanent => ErrorSeverity::Error,
            Self::Critical => ErrorSeverity::Critical,
        }
    }

    fn is_critical(&self) -> bool {
        matches!(self, Self::Critical)
    }

    fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited(after) => Some(*after),
            _ => None,
        }
    }
}
