//! Ollama integration for the agent's chat model
//!
//! # Architecture
//!
//! - **Client**: `OllamaClient` implements the `LlmClient` port over
//!   `POST {base_url}/api/chat`
//! - **Prompt**: a system prompt lists the tools and asks for a JSON reply
//!   carrying either a `tool_call` or a final `response`
//! - **Types**: wire request/response types
//!
//! # Error Handling
//!
//! The client makes one attempt per call. Retries, circuit breaking and
//! fallback to other models happen in the resilient executor, driven by the
//! classification of the returned `AgentError`:
//! - 401/403: authentication, not retried
//! - 429: rate limited, retried after `Retry-After` when present
//! - 5xx and connection failures: network, retried
//! - transport timeouts: timeout, retried
//! - other 4xx: invalid input, not retried

pub mod client;
pub mod prompt;
pub mod types;

pub use client::OllamaClient;
pub use types::{AgentReply, ChatMessage, ReplyToolCall};
