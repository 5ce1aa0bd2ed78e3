//! `execute_command` tool

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use glassbox_core::Tool;
use glassbox_domain::constants::DEFAULT_COMMAND_TIMEOUT_SECS;
use glassbox_domain::{AgentError, Result};
use serde_json::{json, Value};
use tokio::process::Command;
use tracing::{debug, warn};

use super::{optional_u64, required_str};

/// Runs a shell command through `sh -c` and reports its output.
///
/// A command still running when its timeout elapses is killed and the call
/// fails with a non-retryable tool failure.
#[derive(Debug, Clone, Copy)]
pub struct ExecuteCommandTool {
    default_timeout: Duration,
}

impl ExecuteCommandTool {
    pub const fn new(default_timeout: Duration) -> Self {
        Self { default_timeout }
    }
}

impl Default for ExecuteCommandTool {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_COMMAND_TIMEOUT_SECS))
    }
}

#[async_trait]
impl Tool for ExecuteCommandTool {
    fn name(&self) -> &str {
        "execute_command"
    }

    fn description(&self) -> &str {
        "Execute a shell command and return its output. \
         Use this for running scripts, checking system state, etc. \
         Note: Commands are executed in the current working directory."
    }

    fn input_schema(&self) -> Value {
        let default_secs = self.default_timeout.as_secs();
        json!({
            "type": "object",
            "properties": {
                "command": { "type": "string", "description": "The shell command to execute" },
                "timeout": {
                    "type": "integer",
                    "description": format!("Timeout in seconds (default: {default_secs})"),
                    "default": default_secs
                }
            },
            "required": ["command"]
        })
    }

    async fn execute(&self, input: &Value) -> Result<String> {
        let command = required_str(input, "command")?;
        let timeout = match optional_u64(input, "timeout")? {
            Some(0) => {
                return Err(AgentError::InvalidInput("'timeout' must be at least 1 second".into()))
            }
            Some(secs) => Duration::from_secs(secs),
            None => self.default_timeout,
        };

        debug!(command, timeout_secs = timeout.as_secs(), "running shell command");

        let child = Command::new("sh")
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| {
                AgentError::tool_failed(self.name(), format!("failed to spawn shell: {err}"), false)
            })?;

        // Dropping the wait future on timeout drops the child, which kills it.
        let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(|err| {
                let message = format!("failed to collect output: {err}");
                AgentError::tool_failed(self.name(), message, false)
            })?,
            Err(_) => {
                warn!(command, timeout_secs = timeout.as_secs(), "command timed out");
                return Err(AgentError::tool_failed(
                    self.name(),
                    format!("command timed out after {} seconds", timeout.as_secs()),
                    false,
                ));
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let mut sections = Vec::new();

        if !stdout.is_empty() {
            sections.push(format!("[stdout]\n{stdout}"));
        }
        if !stderr.is_empty() {
            sections.push(format!("[stderr]\n{stderr}"));
        }
        if !output.status.success() {
            match output.status.code() {
                Some(code) => sections.push(format!("[exit code: {code}]")),
                None => sections.push("[terminated by signal]".to_string()),
            }
        }

        if sections.is_empty() {
            return Ok("[Command completed with no output]".to_string());
        }
        Ok(sections.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use glassbox_common::error::ErrorClassification;

    use super::*;

    #[tokio::test]
    async fn captures_stdout() {
        let output = ExecuteCommandTool::default()
            .execute(&json!({ "command": "echo hello" }))
            .await
            .unwrap();
        assert_eq!(output, "[stdout]\nhello\n");
    }

    #[tokio::test]
    async fn reports_stderr_and_exit_code() {
        let output = ExecuteCommandTool::default()
            .execute(&json!({ "command": "echo oops >&2; exit 3" }))
            .await
            .unwrap();
        assert_eq!(output, "[stderr]\noops\n\n[exit code: 3]");
    }

    #[tokio::test]
    async fn silent_success() {
        let output =
            ExecuteCommandTool::default().execute(&json!({ "command": "true" })).await.unwrap();
        assert_eq!(output, "[Command completed with no output]");
    }

    #[tokio::test]
    async fn timeout_is_a_permanent_tool_failure() {
        let err = ExecuteCommandTool::default()
            .execute(&json!({ "command": "sleep 5", "timeout": 1 }))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            AgentError::tool_failed("execute_command", "command timed out after 1 seconds", false)
        );
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn rejects_bad_arguments() {
        let tool = ExecuteCommandTool::default();
        assert!(matches!(tool.execute(&json!({})).await, Err(AgentError::InvalidInput(_))));
        assert!(matches!(
            tool.execute(&json!({ "command": "true", "timeout": 0 })).await,
            Err(AgentError::InvalidInput(_))
        ));
        assert!(matches!(
            tool.execute(&json!({ "command": "true", "timeout": "soon" })).await,
            Err(AgentError::InvalidInput(_))
        ));
    }
}
