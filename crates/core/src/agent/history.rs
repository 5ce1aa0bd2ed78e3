//! Provider-neutral conversation history

use glassbox_domain::{Message, ToolCall};
use tracing::debug;

/// Ordered record of one conversation
#[derive(Debug, Clone, Default)]
pub struct MessageHistory {
    messages: Vec<Message>,
}

impl MessageHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user_message(&mut self, content: impl Into<String>) {
        self.push(Message::user(content));
    }

    pub fn add_assistant(&mut self, text: impl Into<String>, tool_calls: Vec<ToolCall>) {
        self.push(Message::assistant(text, tool_calls));
    }

    pub fn add_tool_result(&mut self, call: &ToolCall, content: impl Into<String>, is_error: bool) {
        self.push(Message::tool_result(call, content, is_error));
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        debug!(discarded = self.messages.len(), "history cleared");
        self.messages.clear();
    }

    fn push(&mut self, message: Message) {
        debug!(role = %message.role(), position = self.messages.len(), "message appended");
        self.messages.push(message);
    }
}

#[cfg(test)]
mod tests {
    use glassbox_domain::Role;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_messages_keep_insertion_order() {
        let mut history = MessageHistory::new();
        let call = ToolCall::new("list_files", json!({ "path": "." }));

        history.add_user_message("what is here?");
        history.add_assistant("let me look", vec![call.clone()]);
        history.add_tool_result(&call, "src/\nCargo.toml", false);

        let roles: Vec<Role> = history.messages().iter().map(Message::role).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant, Role::ToolResult]);
        assert_eq!(history.len(), 3);
        assert_eq!(history.last().map(Message::text), Some("src/\nCargo.toml"));
    }

    #[test]
    fn test_clear() {
        let mut history = MessageHistory::new();
        history.add_user_message("hi");
        assert!(!history.is_empty());

        history.clear();
        assert!(history.is_empty());
        assert!(history.last().is_none());
    }
}
