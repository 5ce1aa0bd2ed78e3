//! Scripted `LlmClient` implementations

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use glassbox_core::LlmClient;
use glassbox_domain::{AgentError, LlmResponse, Message, Result, ToolDefinition};
use parking_lot::Mutex;

/// Replays queued replies in order, then repeats `exhausted`.
pub struct ScriptedLlm {
    model: String,
    script: Mutex<VecDeque<Result<LlmResponse>>>,
    exhausted: Result<LlmResponse>,
    calls: AtomicUsize,
    seen_tools: Mutex<Vec<String>>,
    seen_lengths: Mutex<Vec<usize>>,
}

impl ScriptedLlm {
    pub fn new(model: &str, script: Vec<Result<LlmResponse>>) -> Self {
        Self {
            model: model.to_string(),
            script: Mutex::new(script.into()),
            exhausted: Err(AgentError::Internal("script exhausted".into())),
            calls: AtomicUsize::new(0),
            seen_tools: Mutex::new(Vec::new()),
            seen_lengths: Mutex::new(Vec::new()),
        }
    }

    /// A client that answers every call with `reply`.
    pub fn always(model: &str, reply: Result<LlmResponse>) -> Self {
        let mut llm = Self::new(model, Vec::new());
        llm.exhausted = reply;
        llm
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Tool names advertised on the most recent call.
    pub fn seen_tools(&self) -> Vec<String> {
        self.seen_tools.lock().clone()
    }

    /// History length observed on each call.
    pub fn seen_lengths(&self) -> Vec<usize> {
        self.seen_lengths.lock().clone()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    fn provider_name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn chat(&self, messages: &[Message], tools: &[ToolDefinition]) -> Result<LlmResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.seen_tools.lock() = tools.iter().map(|t| t.name.clone()).collect();
        self.seen_lengths.lock().push(messages.len());

        let next = self.script.lock().pop_front();
        next.unwrap_or_else(|| self.exhausted.clone())
    }
}
