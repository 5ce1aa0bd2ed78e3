//! Command-line arguments

use std::path::PathBuf;

use clap::Parser;
use glassbox_domain::Config;

#[derive(Parser, Debug)]
#[command(name = "glassbox", version, about = "Glass-box coding agent for local Ollama models")]
pub struct Cli {
    /// Config file (TOML or JSON); searched for in the usual locations when omitted
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// Primary model, overriding the config file and GLASSBOX_MODEL
    #[arg(short, long)]
    pub model: Option<String>,
    /// LLM provider, overriding the config file and GLASSBOX_PROVIDER
    #[arg(short, long)]
    pub provider: Option<String>,
    /// Ollama server URL, overriding the config file and OLLAMA_BASE_URL
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,
}

impl Cli {
    /// Command-line values win over everything the loader produced.
    pub fn apply(&self, config: &mut Config) {
        if let Some(model) = &self.model {
            config.llm.model.clone_from(model);
        }
        if let Some(provider) = &self.provider {
            config.llm.provider.clone_from(provider);
        }
        if let Some(base_url) = &self.base_url {
            config.llm.base_url.clone_from(base_url);
        }
    }
}
