//! JSON-prompted tool calling for models without native function calling

use glassbox_domain::{LlmResponse, Message, ToolCall, ToolDefinition};
use serde_json::{json, Value};
use tracing::warn;

use super::types::{AgentReply, ChatMessage, ReplyToolCall};

const SYSTEM_PROMPT_HEADER: &str =
    "You are a helpful coding assistant. You have access to the following tools:";

const SYSTEM_PROMPT_RULES: &str = r#"When you need to use a tool, respond with a JSON object in this exact format:
{
  "thought": "your reasoning about what to do",
  "tool_call": {
    "name": "tool_name",
    "input": { "param1": "value1" }
  }
}

When you have completed the task and want to respond to the user (no more tool calls needed), respond with:
{
  "thought": "your reasoning",
  "response": "your final response to the user"
}

IMPORTANT:
- Always respond with valid JSON only, no other text
- Use "tool_call" when you need to use a tool
- Use "response" when you're done and want to reply to the user
- Never include both "tool_call" and "response" in the same message"#;

/// System prompt listing `tools` and the reply protocol.
pub fn system_prompt(tools: &[ToolDefinition]) -> String {
    let listing = tools
        .iter()
        .map(|tool| {
            let schema = serde_json::to_string_pretty(&tool.input_schema)
                .unwrap_or_else(|_| tool.input_schema.to_string());
            format!("- {}: {}\n  Parameters: {schema}", tool.name, tool.description)
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!("{SYSTEM_PROMPT_HEADER}\n\n{listing}\n\n{SYSTEM_PROMPT_RULES}")
}

/// Render the conversation into Ollama messages, system prompt first.
///
/// Assistant turns are replayed in the JSON shape the model produced; tool
/// results become user turns of the form
/// `{"tool_result": {"name": ..., "result": ...}}`.
pub fn render_messages(messages: &[Message], tools: &[ToolDefinition]) -> Vec<ChatMessage> {
    let mut rendered = Vec::with_capacity(messages.len() + 1);
    rendered.push(ChatMessage::new("system", system_prompt(tools)));

    for message in messages {
        let chat = match message {
            Message::User { content } => ChatMessage::new("user", content.clone()),
            Message::Assistant { text, tool_calls } => {
                ChatMessage::new("assistant", assistant_json(text, tool_calls).to_string())
            }
            Message::ToolResult { tool_name, content, .. } => ChatMessage::new(
                "user",
                json!({ "tool_result": { "name": tool_name, "result": content } }).to_string(),
            ),
        };
        rendered.push(chat);
    }

    rendered
}

fn assistant_json(text: &str, tool_calls: &[ToolCall]) -> Value {
    let reply = match tool_calls.first() {
        Some(call) => AgentReply {
            thought: text.to_string(),
            tool_call: Some(ReplyToolCall { name: call.name.clone(), input: call.input.clone() }),
            response: None,
        },
        None => AgentReply {
            thought: String::new(),
            tool_call: None,
            response: Some(Value::String(text.to_string())),
        },
    };
    serde_json::to_value(reply).unwrap_or_else(|_| Value::String(text.to_string()))
}

/// Interpret the model's reply.
///
/// A `tool_call` yields a `ToolUse` response whose text is the thought; a
/// `response` yields the final answer. Anything that is not the expected
/// JSON object degrades to the raw text as a final answer.
pub fn parse_reply(raw: &str) -> LlmResponse {
    let body = strip_code_fence(raw.trim());

    let reply = match serde_json::from_str::<AgentReply>(body) {
        Ok(reply) => reply,
        Err(err) => {
            warn!(error = %err, "model reply is not the expected JSON, treating it as text");
            return LlmResponse::text(body);
        }
    };

    if let Some(call) = reply.tool_call {
        return LlmResponse::tool_use(reply.thought, vec![ToolCall::new(call.name, call.input)]);
    }

    match reply.response {
        Some(Value::String(text)) => LlmResponse::text(text),
        Some(other) => LlmResponse::text(other.to_string()),
        None => LlmResponse::text(body),
    }
}

/// Remove a surrounding Markdown code fence, with or without a language tag.
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}
