//! # Glassbox Domain
//!
//! Plain data shared by every Glassbox crate.
//!
//! This crate contains:
//! - Conversation types (messages, tool calls, LLM responses)
//! - Tool definitions advertised to the model
//! - The agent error type and its retry classification
//! - Configuration records with serde defaults
//! - Domain constants
//!
//! ## Architecture
//! - Depends only on the foundation tier of `glassbox-common`
//! - No I/O, no async runtime
//! - Pure data structures and conversions

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
