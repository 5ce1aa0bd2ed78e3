//! Application context - builds the agent from configuration

use std::sync::Arc;
use std::time::Duration;

use glassbox_common::resilience::ResilientExecutor;
use glassbox_core::{Agent, LlmClient, ToolRegistry};
use glassbox_domain::{AgentError, Config, Result};
use glassbox_infra::config::resilience_config;
use glassbox_infra::{default_tools, OllamaClient};

/// Everything a session needs
pub struct AgentContext {
    pub agent: Agent,
    pub executor: Arc<ResilientExecutor>,
}

impl AgentContext {
    /// # Errors
    /// Returns `AgentError::Config` when the resilience settings are invalid
    /// or the LLM provider is not supported.
    pub fn new(config: &Config) -> Result<Self> {
        let executor = ResilientExecutor::new(resilience_config(&config.resilience)?)
            .map_err(|err| AgentError::Config(err.to_string()))?;
        let executor = Arc::new(executor);

        let primary = OllamaClient::from_config(&config.llm)?;
        let fallback_llms: Vec<Arc<dyn LlmClient>> = config
            .llm
            .fallback_models
            .iter()
            .filter(|model| **model != config.llm.model)
            .map(|model| Arc::new(primary.with_model(model.as_str())) as Arc<dyn LlmClient>)
            .collect();

        let mut tools = ToolRegistry::new();
        tools.register_all(default_tools(Duration::from_secs(config.agent.command_timeout_secs)));

        let agent = Agent::new(
            Arc::new(primary),
            fallback_llms,
            tools,
            Arc::clone(&executor),
            config.agent.max_iterations,
        );

        Ok(Self { agent, executor })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_from_defaults() {
        let ctx = AgentContext::new(&Config::default()).unwrap();

        assert_eq!(ctx.agent.tools().len(), 7);
        assert_eq!(ctx.agent.max_iterations(), 10);
        assert!(ctx.executor.channels().is_empty());
    }

    #[test]
    fn duplicate_primary_is_not_a_fallback() {
        let mut config = Config::default();
        config.llm.fallback_models = vec![config.llm.model.clone(), "mistral:7b".to_string()];

        let ctx = AgentContext::new(&config).unwrap();
        assert!(format!("{:?}", ctx.agent).contains("fallback_llms: 1"));
    }

    #[test]
    fn invalid_resilience_settings_fail_fast() {
        let mut config = Config::default();
        config.resilience.failure_threshold = 0;

        assert!(AgentContext::new(&config).is_err());
    }
}
