//! Error types used throughout the agent

use std::time::Duration;

use glassbox_common::error::{ErrorClassification, ErrorSeverity};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for LLM clients, tools and the agent loop
///
/// Every adapter maps its failures onto one of these variants so the
/// resilience layer can decide, through [`ErrorClassification`], whether a
/// failure is worth retrying.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "details")]
pub enum AgentError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Rate limited: {message}")]
    RateLimited { message: String, retry_after_secs: Option<u64> },

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Tool '{tool}' failed: {message}")]
    ToolFailed { tool: String, message: String, retryable: bool },

    #[error("Configuration error: {0}")]
    Config(String),

    /// A nested resilient call gave up; the rendered causal chain is kept.
    #[error("Unavailable: {0}")]
    Unavailable(String),

    #[error("Reached the maximum of {0} iterations without a final answer")]
    MaxIterations(u32),

    #[error("Security violation: {0}")]
    Security(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AgentError {
    /// Rate limit with an optional server-provided wait hint.
    pub fn rate_limited(message: impl Into<String>, retry_after: Option<Duration>) -> Self {
        Self::RateLimited {
            message: message.into(),
            retry_after_secs: retry_after.map(|d| d.as_secs()),
        }
    }

    pub fn tool_failed(
        tool: impl Into<String>,
        message: impl Into<String>,
        retryable: bool,
    ) -> Self {
        Self::ToolFailed { tool: tool.into(), message: message.into(), retryable }
    }
}

impl ErrorClassification for AgentError {
    fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout(_) | Self::RateLimited { .. } => true,
            Self::ToolFailed { retryable, .. } => *retryable,
            _ => false,
        }
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Security(_) => ErrorSeverity::Critical,
            Self::MaxIterations(_) => ErrorSeverity::Info,
            _ if self.is_retryable() => ErrorSeverity::Warning,
            _ => ErrorSeverity::Error,
        }
    }

    fn is_critical(&self) -> bool {
        matches!(self, Self::Security(_))
    }

    fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after_secs: Some(secs), .. } => {
                Some(Duration::from_secs(*secs))
            }
            _ => None,
        }
    }
}

impl From<serde_json::Error> for AgentError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedResponse(err.to_string())
    }
}

/// Result type alias for agent operations
pub type Result<T> = std::result::Result<T, AgentError>;
