//! Configuration loading and management
//!
//! This module provides utilities for loading application configuration
//! from files and environment variables, and for turning the resilience
//! section into a validated runtime configuration.

pub mod loader;
pub mod resilience;

// Re-export commonly used items
pub use loader::{apply_env_overrides, load, load_from_file, probe_config_paths};
pub use resilience::resilience_config;
