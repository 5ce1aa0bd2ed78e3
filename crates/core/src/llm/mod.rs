//! LLM port and channel naming

pub mod ports;

use glassbox_domain::constants::LLM_CHANNEL_PREFIX;

use self::ports::LlmClient;

/// Executor channel for one provider/model pair, `llm:<provider>:<model>`.
pub fn llm_channel(client: &dyn LlmClient) -> String {
    format!("{LLM_CHANNEL_PREFIX}:{}:{}", client.provider_name(), client.model())
}
