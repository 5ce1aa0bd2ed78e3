//! Shared building blocks for the Glassbox agent crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: error classification (`ErrorClassification`,
//!   `ErrorSeverity`)
//! - `observability`: tracing events (implied by `runtime`)
//! - `runtime`: the resilience subsystem (delay calculator, retry strategy,
//!   circuit breaker, fallback chain, resilient executor)
//! - `test-utils`: everything tests of downstream crates need, including
//!   `MockClock`

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod error;

// Runtime tier
// --------------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod resilience;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "foundation")]
pub use error::{ErrorClassification, ErrorSeverity};
#[cfg(feature = "runtime")]
pub use resilience::{
    fallback, CircuitSnapshot, CircuitState, ResilienceConfig, ResilienceError, ResilientExecutor,
    Served, Tier,
};
