//! # Glassbox Core
//!
//! Pure orchestration layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces for LLM clients and tools (traits)
//! - The provider-neutral message history
//! - The tool registry
//! - The think/act/observe agent loop
//!
//! ## Architecture Principles
//! - Only depends on `glassbox-common` and `glassbox-domain`
//! - No HTTP, filesystem or process code
//! - Every LLM call and tool invocation goes through a `ResilientExecutor`
//!   channel: `llm:<provider>:<model>` per model, `tool_<name>` per tool

pub mod agent;
pub mod errors;
pub mod llm;
pub mod tools;

pub use agent::{Agent, MessageHistory};
pub use errors::flatten_resilience_error;
pub use llm::ports::LlmClient;
pub use llm::llm_channel;
pub use tools::ports::Tool;
pub use tools::registry::ToolRegistry;
pub use tools::tool_channel;
