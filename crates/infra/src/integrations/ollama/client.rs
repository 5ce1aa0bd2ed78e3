//! Ollama chat client

use std::time::Duration;

use async_trait::async_trait;
use glassbox_core::LlmClient;
use glassbox_domain::{AgentError, LlmConfig, LlmResponse, Message, Result, ToolDefinition};
use reqwest::Method;
use tracing::{debug, info};

use super::prompt::{parse_reply, render_messages};
use super::types::{ChatRequest, ChatResponse};
use crate::errors::InfraError;
use crate::http::HttpClient;

const PROVIDER: &str = "ollama";

/// Chat client for a single model on an Ollama server
#[derive(Clone, Debug)]
pub struct OllamaClient {
    http_client: HttpClient,
    base_url: String,
    model: String,
}

impl OllamaClient {
    /// Create a client for `model` served at `base_url`.
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        http_client: HttpClient,
    ) -> Self {
        Self { http_client, base_url: base_url.into(), model: model.into() }
    }

    /// Build the primary client from the `[llm]` configuration section.
    ///
    /// # Errors
    /// Returns `AgentError::Config` when the provider is not `ollama` or the
    /// HTTP client cannot be built.
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        if !config.provider.eq_ignore_ascii_case(PROVIDER) {
            return Err(AgentError::Config(format!(
                "unsupported LLM provider '{}', expected '{PROVIDER}'",
                config.provider
            )));
        }

        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        info!(base_url = %config.base_url, model = %config.model, "Ollama client configured");
        Ok(Self::new(config.base_url.clone(), config.model.clone(), http_client))
    }

    /// Same server and HTTP client, different model.
    pub fn with_model(&self, model: impl Into<String>) -> Self {
        Self {
            http_client: self.http_client.clone(),
            base_url: self.base_url.clone(),
            model: model.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    fn provider_name(&self) -> &str {
        PROVIDER
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn chat(&self, messages: &[Message], tools: &[ToolDefinition]) -> Result<LlmResponse> {
        let payload = ChatRequest {
            model: &self.model,
            messages: render_messages(messages, tools),
            stream: false,
            format: "json",
        };

        let request = self.http_client.request(Method::POST, self.chat_url()).json(&payload);
        let response = self.http_client.send_checked(request).await?;

        let body: ChatResponse =
            response.json().await.map_err(|err| AgentError::from(InfraError::from(err)))?;
        let message = body.message.ok_or_else(|| {
            AgentError::MalformedResponse("Ollama response contained no message".to_string())
        })?;

        debug!(model = %self.model, chars = message.content.len(), "Ollama replied");
        Ok(parse_reply(&message.content))
    }
}
