//! Resilient execution for calls to unreliable collaborators
//!
//! This module provides the pieces used to harden every LLM call and tool
//! invocation:
//! - **Delay Calculator**: exponential backoff with additive jitter
//! - **Retry Strategy**: bounded retries driven by [`ErrorClassification`]
//! - **Circuit Breaker**: per-channel CLOSED / OPEN / HALF_OPEN state machine
//! - **Fallback Chain**: ordered alternatives, each under a time budget
//! - **Resilient Executor**: the facade composing all of the above
//!
//! ## Architecture
//!
//! - Generic over the operation's error type; the only thing the core asks
//!   of an error is its classification.
//! - Circuits are owned by one executor and keyed by channel name. Failures
//!   on one channel never touch another channel's circuit.
//! - Time is injectable ([`Clock`] for circuit timers, [`JitterSource`] for
//!   jitter) and sleeps go through `tokio::time`, so tests run on a paused
//!   clock.
//! - No state survives the process.
//!
//! ## Example
//!
//! ```rust,ignore
//! use glassbox_common::resilience::{fallback, ResilienceConfig, ResilientExecutor};
//!
//! let executor = ResilientExecutor::new(ResilienceConfig::default())?;
//! let answer = executor
//!     .execute_with_fallbacks(
//!         "llm:ollama:llama3.1:8b",
//!         || client.chat(&messages, &tools),
//!         vec![fallback(|| async { Ok(cached.clone()) })],
//!     )
//!     .await?;
//! ```
//!
//! [`ErrorClassification`]: crate::error::ErrorClassification

pub mod backoff;
pub mod circuit_breaker;
pub mod clock;
pub mod config;
pub mod error;
pub mod executor;
pub mod fallback;
pub mod retry;

#[cfg(test)]
pub(crate) mod test_support;

pub use backoff::{DelayCalculator, FixedJitter, JitterSource, SeededJitter, ThreadRngJitter};
pub use circuit_breaker::{
    CircuitBreaker, CircuitError, CircuitOpenError, CircuitSnapshot, CircuitState,
};
pub use clock::{Clock, MockClock, SystemClock};
pub use config::{ConfigError, ConfigResult, ResilienceConfig, ResilienceConfigBuilder};
pub use error::{ResilienceError, ResilienceResult, Tier};
pub use executor::ResilientExecutor;
pub use fallback::{fallback, Fallback, FallbackChain, Served};
pub use retry::{RetryError, RetryOutcome, RetryResult, RetryStrategy};
