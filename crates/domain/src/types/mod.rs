//! Conversation and tool types
//!
//! Provider-neutral shapes exchanged between the agent loop, the LLM
//! adapters and the tools.

pub mod llm;
pub mod message;
pub mod tool;

pub use llm::{LlmResponse, StopReason};
pub use message::{Message, Role, ToolCall};
pub use tool::ToolDefinition;
