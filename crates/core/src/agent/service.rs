//! Agent service - think, act, observe

use std::fmt;
use std::sync::Arc;

use glassbox_common::resilience::{fallback, Fallback, ResilienceError, ResilientExecutor};
use glassbox_domain::{AgentError, LlmResponse, Result, ToolCall};
use tracing::{debug, info, instrument, warn};

use super::history::MessageHistory;
use crate::errors::flatten_resilience_error;
use crate::llm::llm_channel;
use crate::llm::ports::LlmClient;
use crate::tools::registry::ToolRegistry;
use crate::tools::tool_channel;

/// A tool-using agent whose every outbound call is resilient
///
/// The primary model runs on its own `llm:<provider>:<model>` channel. Each
/// fallback model is offered to the fallback chain as an operation that
/// itself goes through `execute` on the fallback's channel, so every model
/// keeps an independent circuit. Tools run on `tool_<name>` channels.
pub struct Agent {
    llm: Arc<dyn LlmClient>,
    fallback_llms: Vec<Arc<dyn LlmClient>>,
    tools: ToolRegistry,
    executor: Arc<ResilientExecutor>,
    history: MessageHistory,
    max_iterations: u32,
}

impl Agent {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        fallback_llms: Vec<Arc<dyn LlmClient>>,
        tools: ToolRegistry,
        executor: Arc<ResilientExecutor>,
        max_iterations: u32,
    ) -> Self {
        Self { llm, fallback_llms, tools, executor, history: MessageHistory::new(), max_iterations }
    }

    /// Answer one user request, calling tools as the model asks.
    ///
    /// # Errors
    /// - [`AgentError::Unavailable`] when the primary model and every
    ///   fallback model failed
    /// - [`AgentError::MaxIterations`] when no final answer arrived in time
    /// - the original error when a model or tool failed critically
    #[instrument(level = "info", skip_all, fields(model = %self.llm.model()))]
    pub async fn run(&mut self, user_input: &str) -> Result<String> {
        self.history.add_user_message(user_input);

        for iteration in 1..=self.max_iterations {
            debug!(iteration, "thinking");
            let response = self.think().await?;
            self.history.add_assistant(response.text.clone(), response.tool_calls.clone());

            if response.is_final() {
                info!(iteration, "final answer produced");
                return Ok(response.text);
            }

            for call in &response.tool_calls {
                let (content, is_error) = self.act(call).await?;
                self.history.add_tool_result(call, content, is_error);
            }
        }

        warn!(max_iterations = self.max_iterations, "iteration budget exhausted");
        Err(AgentError::MaxIterations(self.max_iterations))
    }

    /// Forget the conversation so far.
    pub fn reset(&mut self) {
        self.history.clear();
    }

    pub fn history(&self) -> &MessageHistory {
        &self.history
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn executor(&self) -> &Arc<ResilientExecutor> {
        &self.executor
    }

    pub const fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    async fn think(&self) -> Result<LlmResponse> {
        let messages = self.history.messages();
        let definitions = self.tools.definitions();
        let tools = definitions.as_slice();
        let executor = self.executor.as_ref();

        let fallbacks: Vec<Fallback<'_, LlmResponse, AgentError>> = self
            .fallback_llms
            .iter()
            .map(|client| {
                let client = Arc::clone(client);
                fallback(move || async move {
                    let channel = llm_channel(client.as_ref());
                    executor
                        .execute(&channel, || client.chat(messages, tools))
                        .await
                        .map_err(flatten_resilience_error)
                })
            })
            .collect();

        let channel = llm_channel(self.llm.as_ref());
        let served = executor
            .execute_detailed(&channel, || self.llm.chat(messages, tools), fallbacks)
            .await
            .map_err(flatten_resilience_error)?;

        debug!(tier = %served.tier, tool_calls = served.value.tool_calls.len(), "model replied");
        Ok(served.into_value())
    }

    /// Run one tool call; the returned flag marks an error observation.
    async fn act(&self, call: &ToolCall) -> Result<(String, bool)> {
        if !self.tools.contains(&call.name) {
            warn!(tool = %call.name, "model requested an unknown tool");
            let err = AgentError::NotFound(format!("unknown tool '{}'", call.name));
            return Ok((format!("Error: {err}"), true));
        }

        let channel = tool_channel(&call.name);
        let outcome =
            self.executor.execute(&channel, || self.tools.execute(&call.name, &call.input)).await;

        match outcome {
            Ok(output) => {
                debug!(tool = %call.name, bytes = output.len(), "tool succeeded");
                Ok((output, false))
            }
            Err(ResilienceError::Aborted { source, .. }) => Err(source),
            Err(err) => {
                warn!(tool = %call.name, error = %err, "tool failed");
                Ok((format!("Error: {}", ToolFailure(&err)), true))
            }
        }
    }
}

impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("llm", &llm_channel(self.llm.as_ref()))
            .field("fallback_llms", &self.fallback_llms.len())
            .field("tools", &self.tools)
            .field("history", &self.history.len())
            .field("max_iterations", &self.max_iterations)
            .finish()
    }
}

/// Renders a tool failure for the model: a single permanent failure shows
/// just the tool's own message.
struct ToolFailure<'a>(&'a ResilienceError<AgentError>);

impl fmt::Display for ToolFailure<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            ResilienceError::Permanent { source, .. } => write!(f, "{source}"),
            other => write!(f, "{other}"),
        }
    }
}
