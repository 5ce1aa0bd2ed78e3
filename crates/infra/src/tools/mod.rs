//! Local tools: file access, search, editing and shell commands
//!
//! Each tool implements the [`Tool`] port. Argument problems surface as
//! [`AgentError::InvalidInput`]; I/O failures are classified through the
//! `io::Error` retry classification so that only transient kinds are
//! retried by the executor.

pub mod edit_file;
pub mod execute_command;
pub mod glob;
pub mod grep;
pub mod list_files;
pub mod read_file;
pub mod write_file;

use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use glassbox_common::error::ErrorClassification;
use glassbox_core::Tool;
use glassbox_domain::{AgentError, Result};
use serde_json::Value;

pub use edit_file::EditFileTool;
pub use execute_command::ExecuteCommandTool;
pub use glob::GlobTool;
pub use grep::GrepTool;
pub use list_files::ListFilesTool;
pub use read_file::ReadFileTool;
pub use write_file::WriteFileTool;

/// Every built-in tool: the four basics, then the search and edit tools.
pub fn default_tools(command_timeout: Duration) -> Vec<Arc<dyn Tool>> {
    vec![
        Arc::new(ReadFileTool),
        Arc::new(WriteFileTool),
        Arc::new(ListFilesTool),
        Arc::new(ExecuteCommandTool::new(command_timeout)),
        Arc::new(EditFileTool),
        Arc::new(GrepTool),
        Arc::new(GlobTool),
    ]
}

pub(crate) fn required_str<'a>(input: &'a Value, key: &str) -> Result<&'a str> {
    match input.get(key) {
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(other) => {
            Err(AgentError::InvalidInput(format!("'{key}' must be a string, got {other}")))
        }
        None => Err(AgentError::InvalidInput(format!("missing required argument '{key}'"))),
    }
}

pub(crate) fn optional_str<'a>(input: &'a Value, key: &str, default: &'a str) -> Result<&'a str> {
    match input.get(key) {
        None | Some(Value::Null) => Ok(default),
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(other) => {
            Err(AgentError::InvalidInput(format!("'{key}' must be a string, got {other}")))
        }
    }
}

/// Result cap from `max_results`; absent or zero means `default`.
pub(crate) fn max_results(input: &Value, default: usize) -> Result<usize> {
    let limit = optional_u64(input, "max_results")?.filter(|n| *n > 0);
    Ok(limit.map_or(default, |n| usize::try_from(n).unwrap_or(usize::MAX)))
}

/// Run a filesystem walk off the async runtime.
pub(crate) async fn run_blocking<T, F>(tool: &str, work: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|err| AgentError::Internal(format!("{tool} worker failed: {err}")))?
}

pub(crate) fn optional_bool(input: &Value, key: &str, default: bool) -> Result<bool> {
    match input.get(key) {
        None | Some(Value::Null) => Ok(default),
        Some(Value::Bool(b)) => Ok(*b),
        Some(other) => {
            Err(AgentError::InvalidInput(format!("'{key}' must be a boolean, got {other}")))
        }
    }
}

pub(crate) fn optional_u64(input: &Value, key: &str) -> Result<Option<u64>> {
    match input.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value.as_u64().map(Some).ok_or_else(|| {
            AgentError::InvalidInput(format!("'{key}' must be a non-negative integer, got {value}"))
        }),
    }
}

/// Classify an I/O failure on `path` for the tool named `tool`.
pub(crate) fn io_error(tool: &str, path: &Path, err: &io::Error) -> AgentError {
    match err.kind() {
        io::ErrorKind::NotFound => AgentError::NotFound(path.display().to_string()),
        io::ErrorKind::PermissionDenied => {
            AgentError::tool_failed(tool, format!("permission denied: {}", path.display()), false)
        }
        _ => {
            AgentError::tool_failed(tool, format!("{}: {err}", path.display()), err.is_retryable())
        }
    }
}
