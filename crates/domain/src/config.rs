//! Configuration records
//!
//! Every field has a serde default, so a partial TOML or JSON file (or no
//! file at all) yields a complete configuration. Validation of the
//! resilience values happens when they are turned into the runtime
//! configuration, not here.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_COMMAND_TIMEOUT_SECS, DEFAULT_LOG_LEVEL, DEFAULT_MAX_ITERATIONS, DEFAULT_MODEL,
    DEFAULT_OLLAMA_BASE_URL, DEFAULT_PROVIDER, DEFAULT_REQUEST_TIMEOUT_SECS,
};

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub llm: LlmConfig,
    pub agent: AgentSettings,
    pub resilience: ResilienceSettings,
    pub logging: LoggingSettings,
}

/// Which model to talk to, and where
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: String,
    pub model: String,
    pub base_url: String,
    /// Models tried in order when the primary model's call fails.
    pub fallback_models: Vec<String>,
    pub request_timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: DEFAULT_PROVIDER.to_string(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_OLLAMA_BASE_URL.to_string(),
            fallback_models: Vec::new(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    pub max_iterations: u32,
    pub command_timeout_secs: u64,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            command_timeout_secs: DEFAULT_COMMAND_TIMEOUT_SECS,
        }
    }
}

/// Resilience tuning as it appears in configuration files
///
/// Durations are fractional seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResilienceSettings {
    pub max_retries: u32,
    pub base_delay: f64,
    pub max_delay: f64,
    pub exponential_base: f64,
    pub jitter_factor: f64,
    pub max_fallback_depth: usize,
    pub fallback_timeout: f64,
    pub failure_threshold: u32,
    pub recovery_timeout: f64,
    pub half_open_max_calls: u32,
}

impl Default for ResilienceSettings {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: 1.0,
            max_delay: 30.0,
            exponential_base: 2.0,
            jitter_factor: 0.1,
            max_fallback_depth: 4,
            fallback_timeout: 60.0,
            failure_threshold: 5,
            recovery_timeout: 30.0,
            half_open_max_calls: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive; `RUST_LOG` takes precedence.
    pub level: String,
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self { level: DEFAULT_LOG_LEVEL.to_string(), json: false }
    }
}
