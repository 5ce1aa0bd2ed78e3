//! Port interface for agent tools

use async_trait::async_trait;
use glassbox_domain::{Result, ToolDefinition};
use serde_json::Value;

/// An action the model can request
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name the model refers to the tool by
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON schema of the tool's input object
    fn input_schema(&self) -> Value;

    /// Run the tool. Missing or malformed arguments fail with
    /// [`AgentError::InvalidInput`](glassbox_domain::AgentError::InvalidInput).
    async fn execute(&self, input: &Value) -> Result<String>;

    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(self.name(), self.description(), self.input_schema())
    }
}
