//! # Glassbox Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - Configuration loading (TOML/JSON files, environment overrides)
//! - Logging initialisation
//! - The HTTP client and the Ollama chat integration
//! - Local tools: file access, search, editing and shell commands
//!
//! ## Architecture
//! - Implements traits defined in `glassbox-core`
//! - Depends on `glassbox-domain` and `glassbox-core`
//! - Contains all "impure" code (I/O, network, processes)

pub mod config;
pub mod errors;
pub mod http;
pub mod integrations;
pub mod observability;
pub mod tools;

// Re-export commonly used items
pub use http::HttpClient;
pub use integrations::ollama::OllamaClient;
pub use tools::default_tools;
