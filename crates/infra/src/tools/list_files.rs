//! `list_files` tool

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use glassbox_core::Tool;
use glassbox_domain::constants::MAX_LIST_ENTRIES;
use glassbox_domain::{AgentError, Result};
use serde_json::{json, Value};
use tracing::debug;

use super::{io_error, optional_bool, optional_str};

/// Lists a directory, optionally recursively.
///
/// Entries are sorted by name, directories carry a trailing `/`, hidden
/// entries are skipped, and output stops after [`MAX_LIST_ENTRIES`] lines.
#[derive(Debug, Default, Clone, Copy)]
pub struct ListFilesTool;

struct Entry {
    name: String,
    is_dir: bool,
}

#[async_trait]
impl Tool for ListFilesTool {
    fn name(&self) -> &str {
        "list_files"
    }

    fn description(&self) -> &str {
        "List files and directories in the specified directory. \
         Directories end with '/'. Set recursive to true to include subdirectories."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "The directory path to list contents of",
                    "default": "."
                },
                "recursive": {
                    "type": "boolean",
                    "description": "Whether to list files recursively (default: false)",
                    "default": false
                }
            }
        })
    }

    async fn execute(&self, input: &Value) -> Result<String> {
        let root = Path::new(optional_str(input, "path", ".")?);
        let recursive = optional_bool(input, "recursive", false)?;

        let metadata =
            tokio::fs::metadata(root).await.map_err(|err| io_error(self.name(), root, &err))?;
        if !metadata.is_dir() {
            return Err(AgentError::InvalidInput(format!("not a directory: {}", root.display())));
        }

        let top = read_sorted(root).await.map_err(|err| io_error(self.name(), root, &err))?;
        let (lines, truncated) = walk(root, top, recursive).await;
        debug!(path = %root.display(), entries = lines.len(), truncated, "directory listed");

        if lines.is_empty() {
            return Ok(format!("Directory is empty: {}", root.display()));
        }

        let mut output = lines.join("\n");
        if truncated {
            output.push_str(&format!("\n... (truncated at {MAX_LIST_ENTRIES} entries)"));
        }
        Ok(output)
    }
}

/// Depth-first walk in name order. Unreadable subdirectories are skipped.
async fn walk(root: &Path, top: Vec<Entry>, recursive: bool) -> (Vec<String>, bool) {
    let mut lines = Vec::new();
    let mut stack = vec![(PathBuf::new(), top.into_iter())];

    loop {
        let Some((prefix, entries)) = stack.last_mut() else { break };
        let Some(entry) = entries.next() else {
            stack.pop();
            continue;
        };
        let relative = prefix.join(&entry.name);

        if lines.len() >= MAX_LIST_ENTRIES {
            return (lines, true);
        }

        if entry.is_dir {
            lines.push(format!("{}/", relative.display()));
            if recursive {
                match read_sorted(&root.join(&relative)).await {
                    Ok(children) => stack.push((relative, children.into_iter())),
                    Err(err) => debug!(
                        path = %relative.display(),
                        error = %err,
                        "skipping unreadable directory"
                    ),
                }
            }
        } else {
            lines.push(relative.display().to_string());
        }
    }

    (lines, false)
}

async fn read_sorted(dir: &Path) -> std::io::Result<Vec<Entry>> {
    let mut reader = tokio::fs::read_dir(dir).await?;
    let mut entries = Vec::new();

    while let Some(entry) = reader.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        let is_dir = entry.file_type().await.map(|t| t.is_dir()).unwrap_or(false);
        entries.push(Entry { name, is_dir });
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}
