//! Name-indexed collection of tools

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use glassbox_domain::{AgentError, Result, ToolDefinition};
use serde_json::Value;
use tracing::{debug, warn};

use super::ports::Tool;

/// Tools available to the agent, ordered by name
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool, replacing any tool already registered under the
    /// same name. The replaced tool is returned.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Option<Arc<dyn Tool>> {
        let name = tool.name().to_string();
        let previous = self.tools.insert(name.clone(), tool);
        if previous.is_some() {
            warn!(tool = %name, "tool re-registered, replacing previous definition");
        } else {
            debug!(tool = %name, "tool registered");
        }
        previous
    }

    pub fn register_all<I>(&mut self, tools: I)
    where
        I: IntoIterator<Item = Arc<dyn Tool>>,
    {
        for tool in tools {
            self.register(tool);
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Definitions of every tool, sorted by name
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|tool| tool.definition()).collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Run the named tool with `input`.
    ///
    /// # Errors
    /// [`AgentError::NotFound`] when no tool has that name; otherwise
    /// whatever the tool returns.
    pub async fn execute(&self, name: &str, input: &Value) -> Result<String> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| AgentError::NotFound(format!("unknown tool '{name}'")))?;
        tool.execute(input).await
    }
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRegistry").field("tools", &self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use serde_json::json;

    use super::*;

    struct StaticTool {
        name: &'static str,
        output: &'static str,
    }

    #[async_trait]
    impl Tool for StaticTool {
        fn name(&self) -> &str {
            self.name
        }

        fn description(&self) -> &str {
            "returns a fixed string"
        }

        fn input_schema(&self) -> Value {
            json!({ "type": "object", "properties": {} })
        }

        async fn execute(&self, _input: &Value) -> Result<String> {
            Ok(self.output.to_string())
        }
    }

    fn tool(name: &'static str, output: &'static str) -> Arc<dyn Tool> {
        Arc::new(StaticTool { name, output })
    }

    #[test]
    fn test_definitions_sorted_by_name() {
        let mut registry = ToolRegistry::new();
        registry.register_all([
            tool("write_file", ""),
            tool("list_files", ""),
            tool("read_file", ""),
        ]);

        let names: Vec<String> = registry.definitions().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["list_files", "read_file", "write_file"]);
        assert_eq!(registry.names(), vec!["list_files", "read_file", "write_file"]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_register_overwrites() {
        let mut registry = ToolRegistry::new();
        assert!(registry.register(tool("echo", "first")).is_none());
        assert!(registry.register(tool("echo", "second")).is_some());
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_execute_dispatches_by_name() {
        let mut registry = ToolRegistry::new();
        registry.register(tool("echo", "pong"));

        assert_eq!(registry.execute("echo", &json!({})).await.unwrap(), "pong");
        assert!(registry.contains("echo"));
        assert!(!registry.contains("missing"));
    }

    #[tokio::test]
    async fn test_execute_unknown_tool() {
        let registry = ToolRegistry::new();
        let err = registry.execute("rm", &json!({})).await.unwrap_err();
        assert_eq!(err, AgentError::NotFound("unknown tool 'rm'".into()));
        assert!(registry.is_empty());
    }
}
