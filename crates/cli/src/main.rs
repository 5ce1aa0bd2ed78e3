//! Glassbox - interactive coding agent
//!
//! Main entry point: wires configuration, logging, the resilient executor,
//! the Ollama clients and the local tools, then runs a line-oriented session.

mod cli;
mod context;
mod session;

use clap::Parser;
use cli::Cli;
use context::AgentContext;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // .env first so that GLASSBOX_* overrides in it are visible to the loader
    let dotenv = dotenvy::dotenv();

    let mut config = glassbox_infra::config::load(cli.config.clone())?;
    cli.apply(&mut config);
    glassbox_infra::observability::logging::init(&config.logging)?;

    match dotenv {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env"),
        Err(err) => tracing::debug!(error = %err, "No .env loaded"),
    }

    let ctx = AgentContext::new(&config)?;
    tracing::info!(
        model = %config.llm.model,
        fallbacks = config.llm.fallback_models.len(),
        tools = ctx.agent.tools().len(),
        "Glassbox initialized"
    );

    session::run(ctx).await
}
