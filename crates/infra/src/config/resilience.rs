//! Conversion of file-level resilience settings into [`ResilienceConfig`]

use std::time::Duration;

use glassbox_common::resilience::ResilienceConfig;
use glassbox_domain::{AgentError, ResilienceSettings, Result};

/// Build the validated runtime configuration.
///
/// # Errors
/// [`AgentError::Config`] when a duration is negative or not finite, or
/// when the values violate the executor's invariants (for example
/// `base_delay > max_delay` or a zero failure threshold).
pub fn resilience_config(settings: &ResilienceSettings) -> Result<ResilienceConfig> {
    ResilienceConfig::builder()
        .max_retries(settings.max_retries)
        .base_delay(seconds("base_delay", settings.base_delay)?)
        .max_delay(seconds("max_delay", settings.max_delay)?)
        .exponential_base(settings.exponential_base)
        .jitter_factor(settings.jitter_factor)
        .max_fallback_depth(settings.max_fallback_depth)
        .fallback_timeout(seconds("fallback_timeout", settings.fallback_timeout)?)
        .failure_threshold(settings.failure_threshold)
        .recovery_timeout(seconds("recovery_timeout", settings.recovery_timeout)?)
        .half_open_max_calls(settings.half_open_max_calls)
        .build()
        .map_err(|err| AgentError::Config(err.to_string()))
}

fn seconds(field: &str, value: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(value).map_err(|_| {
        AgentError::Config(format!(
            "resilience.{field} must be a non-negative number of seconds, got {value}"
        ))
    })
}
