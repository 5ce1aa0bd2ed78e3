//! `edit_file` tool

use std::path::Path;

use async_trait::async_trait;
use glassbox_core::Tool;
use glassbox_domain::{AgentError, Result};
use serde_json::{json, Value};
use tracing::debug;

use super::{io_error, required_str};

/// Longest slice of `old_string` echoed back when it cannot be found.
const ECHO_LIMIT: usize = 200;

/// Replaces one exact occurrence of a string in a file.
///
/// The edit only applies when `old_string` occurs exactly once, so an
/// ambiguous match never rewrites the wrong spot.
#[derive(Debug, Default, Clone, Copy)]
pub struct EditFileTool;

#[async_trait]
impl Tool for EditFileTool {
    fn name(&self) -> &str {
        "edit_file"
    }

    fn description(&self) -> &str {
        "Edit a file by replacing a specific string with a new string. \
         The old_string must appear exactly once in the file for the edit to succeed. \
         Use an empty new_string to delete the old_string. \
         This is more efficient than rewriting the entire file with write_file."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": { "type": "string", "description": "The path to the file to edit" },
                "old_string": {
                    "type": "string",
                    "description": "The exact string to find and replace (must appear exactly once)"
                },
                "new_string": {
                    "type": "string",
                    "description": "The string to replace old_string with (empty string to delete)"
                }
            },
            "required": ["path", "old_string", "new_string"]
        })
    }

    async fn execute(&self, input: &Value) -> Result<String> {
        let path = Path::new(required_str(input, "path")?);
        let old_string = required_str(input, "old_string")?;
        let new_string = required_str(input, "new_string")?;

        let metadata =
            tokio::fs::metadata(path).await.map_err(|err| io_error(self.name(), path, &err))?;
        if !metadata.is_file() {
            return Err(AgentError::InvalidInput(format!("path is not a file: {}", path.display())));
        }

        let content =
            tokio::fs::read_to_string(path).await.map_err(|err| io_error(self.name(), path, &err))?;

        match content.matches(old_string).count() {
            0 => return Err(AgentError::InvalidInput(not_found_message(path, old_string))),
            1 => {}
            count => {
                return Err(AgentError::InvalidInput(format!(
                    "old_string appears {count} times in {}. It must appear exactly once for safe \
                     editing. Provide more context in old_string to make it unique.",
                    path.display()
                )))
            }
        }

        let updated = content.replacen(old_string, new_string, 1);
        tokio::fs::write(path, &updated).await.map_err(|err| io_error(self.name(), path, &err))?;
        debug!(
            path = %path.display(),
            removed = old_string.len(),
            inserted = new_string.len(),
            "file edited"
        );

        Ok(if new_string.is_empty() {
            format!("Successfully deleted text from {}", path.display())
        } else if old_string.is_empty() {
            format!("Successfully inserted text at the beginning of {}", path.display())
        } else {
            format!("Successfully edited {}", path.display())
        })
    }
}

fn not_found_message(path: &Path, old_string: &str) -> String {
    let shown = match old_string.char_indices().nth(ECHO_LIMIT) {
        Some((cut, _)) => format!("{}...", &old_string[..cut]),
        None => old_string.to_string(),
    };
    format!("old_string not found in {}.\nSearched for:\n{shown}", path.display())
}
