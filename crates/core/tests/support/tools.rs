//! In-memory `Tool` implementations

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use glassbox_core::Tool;
use glassbox_domain::{AgentError, Result};
use serde_json::{json, Value};

/// Echoes its `text` argument.
pub struct EchoTool;

#[async_trait]
impl Tool for EchoTool {
    fn name(&self) -> &str {
        "echo"
    }

    fn description(&self) -> &str {
        "Echo the given text"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": { "text": { "type": "string" } },
            "required": ["text"]
        })
    }

    async fn execute(&self, input: &Value) -> Result<String> {
        input
            .get("text")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| AgentError::InvalidInput("missing 'text'".into()))
    }
}

/// Fails with a fixed error, counting invocations.
pub struct FailingTool {
    pub name: &'static str,
    pub error: AgentError,
    pub calls: AtomicUsize,
}

impl FailingTool {
    pub fn new(name: &'static str, error: AgentError) -> Self {
        Self { name, error, calls: AtomicUsize::new(0) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Tool for FailingTool {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        "Always fails"
    }

    fn input_schema(&self) -> Value {
        json!({ "type": "object", "properties": {} })
    }

    async fn execute(&self, _input: &Value) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(self.error.clone())
    }
}
