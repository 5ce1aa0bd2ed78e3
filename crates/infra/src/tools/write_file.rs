//! `write_file` tool

use std::path::Path;

use async_trait::async_trait;
use glassbox_core::Tool;
use glassbox_domain::Result;
use serde_json::{json, Value};
use tracing::debug;

use super::{io_error, required_str};

/// Creates or overwrites a file, creating parent directories as needed.
#[derive(Debug, Default, Clone, Copy)]
pub struct WriteFileTool;

#[async_trait]
impl Tool for WriteFileTool {
    fn name(&self) -> &str {
        "write_file"
    }

    fn description(&self) -> &str {
        "Write content to a file at the specified path. \
         Creates the file if it doesn't exist, or overwrites it if it does. \
         Parent directories will be created if they don't exist."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": { "type": "string", "description": "The path to the file to write" },
                "content": { "type": "string", "description": "The content to write to the file" }
            },
            "required": ["path", "content"]
        })
    }

    async fn execute(&self, input: &Value) -> Result<String> {
        let path = Path::new(required_str(input, "path")?);
        let content = required_str(input, "content")?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|err| io_error(self.name(), parent, &err))?;
        }

        tokio::fs::write(path, content).await.map_err(|err| io_error(self.name(), path, &err))?;
        debug!(path = %path.display(), bytes = content.len(), "file written");

        Ok(format!("Successfully wrote {} bytes to {}", content.len(), path.display()))
    }
}
