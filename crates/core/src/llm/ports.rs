//! Port interface for chat-capable language models

use async_trait::async_trait;
use glassbox_domain::{LlmResponse, Message, Result, ToolDefinition};

/// A chat model the agent can think with
///
/// Implementations translate the provider-neutral conversation into their
/// wire format and map every failure onto an
/// [`AgentError`](glassbox_domain::AgentError) whose classification says
/// whether a retry can help.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Provider identifier, e.g. `ollama`
    fn provider_name(&self) -> &str;

    /// Model identifier, e.g. `llama3.1:8b`
    fn model(&self) -> &str;

    /// Send the conversation and the available tools, returning the next
    /// assistant turn.
    async fn chat(&self, messages: &[Message], tools: &[ToolDefinition]) -> Result<LlmResponse>;
}
