//! `read_file` tool

use std::path::Path;

use async_trait::async_trait;
use glassbox_core::Tool;
use glassbox_domain::{AgentError, Result};
use serde_json::{json, Value};
use tracing::debug;

use super::{io_error, required_str};

/// Returns the UTF-8 contents of a file.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReadFileTool;

#[async_trait]
impl Tool for ReadFileTool {
    fn name(&self) -> &str {
        "read_file"
    }

    fn description(&self) -> &str {
        "Read the contents of a file at the specified path. \
         Use this tool when you need to examine file contents."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": { "type": "string", "description": "The path to the file to read" }
            },
            "required": ["path"]
        })
    }

    async fn execute(&self, input: &Value) -> Result<String> {
        let path = Path::new(required_str(input, "path")?);

        let metadata =
            tokio::fs::metadata(path).await.map_err(|err| io_error(self.name(), path, &err))?;
        if metadata.is_dir() {
            return Err(AgentError::InvalidInput(format!(
                "path is a directory: {}",
                path.display()
            )));
        }

        let contents =
            tokio::fs::read_to_string(path).await.map_err(|err| io_error(self.name(), path, &err))?;
        debug!(path = %path.display(), bytes = contents.len(), "file read");
        Ok(contents)
    }
}
