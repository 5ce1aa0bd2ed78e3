//! Shared configuration for every resilience component
//!
//! One validated [`ResilienceConfig`] is built per executor and shared
//! read-only (behind an `Arc`) by its delay calculator, retry strategy,
//! circuits and fallback chain.

use std::time::Duration;

use thiserror::Error;

/// Configuration validation error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },
}

impl ConfigError {
    fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid { message: message.into() }
    }
}

/// Configuration result type
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Immutable settings for retry, circuit breaking and fallback
#[derive(Debug, Clone, PartialEq)]
pub struct ResilienceConfig {
    /// Upper bound on retry attempts after the first try
    pub max_retries: u32,
    /// First backoff interval
    pub base_delay: Duration,
    /// Ceiling on the computed backoff interval (before jitter)
    pub max_delay: Duration,
    /// Multiplier applied per attempt
    pub exponential_base: f64,
    /// Fraction of the computed delay added as uniform random jitter
    pub jitter_factor: f64,
    /// Consecutive failures before a circuit opens
    pub failure_threshold: u32,
    /// How long an OPEN circuit waits before letting a probe through
    pub recovery_timeout: Duration,
    /// Successful probes required in HALF_OPEN before closing
    pub half_open_max_calls: u32,
    /// Cap on the number of fallbacks tried
    pub max_fallback_depth: usize,
    /// Time budget for each fallback attempt
    pub fallback_timeout: Duration,
}

impl Default for ResilienceConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            exponential_base: 2.0,
            jitter_factor: 0.1,
            failure_threshold: 5,
            recovery_timeout: Duration::from_secs(30),
            half_open_max_calls: 3,
            max_fallback_depth: 4,
            fallback_timeout: Duration::from_secs(60),
        }
    }
}

impl ResilienceConfig {
    /// Create a configuration builder seeded with the defaults
    pub fn builder() -> ResilienceConfigBuilder {
        ResilienceConfigBuilder::new()
    }

    /// Validate the configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.base_delay > self.max_delay {
            return Err(ConfigError::invalid("base_delay must not exceed max_delay"));
        }

        if !self.exponential_base.is_finite() || self.exponential_base < 1.0 {
            return Err(ConfigError::invalid("exponential_base must be a finite number >= 1.0"));
        }

        if !(0.0..=1.0).contains(&self.jitter_factor) {
            return Err(ConfigError::invalid("jitter_factor must be between 0.0 and 1.0"));
        }

        if self.failure_threshold == 0 {
            return Err(ConfigError::invalid("failure_threshold must be greater than 0"));
        }

        if self.half_open_max_calls == 0 {
            return Err(ConfigError::invalid("half_open_max_calls must be greater than 0"));
        }

        if self.fallback_timeout.is_zero() {
            return Err(ConfigError::invalid("fallback_timeout must be greater than 0"));
        }

        Ok(())
    }
}

/// Builder for [`ResilienceConfig`]
#[derive(Debug, Clone)]
pub struct ResilienceConfigBuilder {
    config: ResilienceConfig,
}

impl Default for ResilienceConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ResilienceConfigBuilder {
    pub fn new() -> Self {
        Self { config: ResilienceConfig::default() }
    }

    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    pub fn base_delay(mut self, delay: Duration) -> Self {
        self.config.base_delay = delay;
        self
    }

    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.config.max_delay = delay;
        self
    }

    pub fn exponential_base(mut self, base: f64) -> Self {
        self.config.exponential_base = base;
        self
    }

    pub fn jitter_factor(mut self, factor: f64) -> Self {
        self.config.jitter_factor = factor;
        self
    }

    /// Disable jitter entirely (equivalent to `jitter_factor(0.0)`)
    pub fn no_jitter(self) -> Self {
        self.jitter_factor(0.0)
    }

    pub fn failure_threshold(mut self, threshold: u32) -> Self {
        self.config.failure_threshold = threshold;
        self
    }

    pub fn recovery_timeout(mut self, timeout: Duration) -> Self {
        self.config.recovery_timeout = timeout;
        self
    }

    pub fn half_open_max_calls(mut self, calls: u32) -> Self {
        self.config.half_open_max_calls = calls;
        self
    }

    pub fn max_fallback_depth(mut self, depth: usize) -> Self {
        self.config.max_fallback_depth = depth;
        self
    }

    pub fn fallback_timeout(mut self, timeout: Duration) -> Self {
        self.config.fallback_timeout = timeout;
        self
    }

    pub fn build(self) -> ConfigResult<ResilienceConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
