//! Conversation messages

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::constants::TOOL_CALL_ID_PREFIX;
use crate::impl_wire_name_conversions;

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
    ToolResult,
}

impl_wire_name_conversions!(Role {
    User => "user",
    Assistant => "assistant",
    ToolResult => "tool_result",
});

/// A request from the model to run one tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub input: Value,
}

impl ToolCall {
    /// Create a call with a fresh `call_<8 hex>` id.
    pub fn new(name: impl Into<String>, input: Value) -> Self {
        Self { id: Self::generate_id(), name: name.into(), input }
    }

    pub fn generate_id() -> String {
        let hex = Uuid::new_v4().simple().to_string();
        format!("{TOOL_CALL_ID_PREFIX}{}", &hex[..8])
    }
}

/// One entry in the provider-neutral conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Message {
    User {
        content: String,
    },
    Assistant {
        text: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tool_calls: Vec<ToolCall>,
    },
    ToolResult {
        tool_call_id: String,
        tool_name: String,
        content: String,
        #[serde(default)]
        is_error: bool,
    },
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self::User { content: content.into() }
    }

    pub fn assistant(text: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self::Assistant { text: text.into(), tool_calls }
    }

    pub fn tool_result(call: &ToolCall, content: impl Into<String>, is_error: bool) -> Self {
        Self::ToolResult {
            tool_call_id: call.id.clone(),
            tool_name: call.name.clone(),
            content: content.into(),
            is_error,
        }
    }

    pub const fn role(&self) -> Role {
        match self {
            Self::User { .. } => Role::User,
            Self::Assistant { .. } => Role::Assistant,
            Self::ToolResult { .. } => Role::ToolResult,
        }
    }

    /// The human-readable body of the message.
    pub fn text(&self) -> &str {
        match self {
            Self::User { content } | Self::ToolResult { content, .. } => content,
            Self::Assistant { text, .. } => text,
        }
    }
}
