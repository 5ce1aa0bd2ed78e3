//! Observability infrastructure
//!
//! The crates log through `tracing`; this module installs the subscriber
//! that turns those events into human-readable or JSON lines on stderr.

pub mod logging;

pub use logging::init;
