//! LLM response types

use serde::{Deserialize, Serialize};

use super::message::ToolCall;
use crate::impl_wire_name_conversions;

/// Why the model stopped generating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    #[default]
    EndTurn,
    ToolUse,
}

impl_wire_name_conversions!(StopReason {
    EndTurn => "end_turn",
    ToolUse => "tool_use",
});

/// A provider-neutral chat completion
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LlmResponse {
    pub text: String,
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
    #[serde(default)]
    pub stop_reason: StopReason,
}

impl LlmResponse {
    /// A final answer with no tool calls.
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: text.into(), tool_calls: Vec::new(), stop_reason: StopReason::EndTurn }
    }

    pub fn tool_use(text: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self { text: text.into(), tool_calls, stop_reason: StopReason::ToolUse }
    }

    /// True when the agent loop should hand the text back to the user.
    pub fn is_final(&self) -> bool {
        self.stop_reason == StopReason::EndTurn || self.tool_calls.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_is_final() {
        assert!(LlmResponse::text("42").is_final());
        assert!(!LlmResponse::tool_use("", vec![ToolCall::new("read_file", json!({}))]).is_final());
        // ToolUse without any call has nothing to act on
        assert!(LlmResponse::tool_use("hmm", Vec::new()).is_final());
    }

    #[test]
    fn test_stop_reason_wire_names() {
        assert_eq!(StopReason::ToolUse.to_string(), "tool_use");
        assert_eq!(serde_json::to_value(StopReason::EndTurn).unwrap(), json!("end_turn"));
    }
}
