//! Conversions from external infrastructure errors into agent errors.

use std::time::Duration;

use glassbox_domain::AgentError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub AgentError);

impl From<InfraError> for AgentError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<AgentError> for InfraError {
    fn from(value: AgentError) -> Self {
        Self(value)
    }
}

/// Map a non-success HTTP status onto the agent error taxonomy.
///
/// 401/403 are authentication failures, 429 is a rate limit (with the
/// server's `Retry-After` hint when present), 5xx is a retryable network
/// failure and any other 4xx is rejected input.
pub fn status_error(status: u16, retry_after: Option<Duration>, body: &str) -> AgentError {
    let message = if body.trim().is_empty() {
        format!("HTTP {status}")
    } else {
        format!("HTTP {status}: {}", body.trim())
    };

    match status {
        401 | 403 => AgentError::Auth(message),
        429 => AgentError::rate_limited(message, retry_after),
        400..=499 => AgentError::InvalidInput(message),
        _ => AgentError::Network(message),
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → AgentError */
/* -------------------------------------------------------------------------- */

impl From<HttpError> for InfraError {
    fn from(err: HttpError) -> Self {
        if err.is_timeout() {
            return Self(AgentError::Timeout(format!("HTTP request timed out: {err}")));
        }

        if err.is_connect() {
            return Self(AgentError::Network(format!("HTTP connection failure: {err}")));
        }

        if let Some(status) = err.status() {
            return Self(status_error(status.as_u16(), None, ""));
        }

        if err.is_decode() {
            return Self(AgentError::MalformedResponse(format!("undecodable HTTP body: {err}")));
        }

        if err.is_builder() {
            return Self(AgentError::Config(format!("invalid HTTP request: {err}")));
        }

        Self(AgentError::Network(err.to_string()))
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
