//! Tracing subscriber initialisation

use glassbox_domain::{AgentError, LoggingSettings, Result};
use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber.
///
/// `RUST_LOG` takes precedence over `settings.level`. Output goes to stderr
/// so it never interleaves with the interactive session on stdout.
///
/// # Errors
/// [`AgentError::Config`] for an invalid level directive or when a global
/// subscriber is already installed.
pub fn init(settings: &LoggingSettings) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => parse_filter(&settings.level)?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    let installed = if settings.json { builder.json().try_init() } else { builder.try_init() };
    installed
        .map_err(|err| AgentError::Config(format!("failed to install tracing subscriber: {err}")))
}

/// Parse a filter directive such as `info` or `glassbox_core=debug,warn`.
pub fn parse_filter(directive: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(directive)
        .map_err(|err| AgentError::Config(format!("invalid log level '{directive}': {err}")))
}
