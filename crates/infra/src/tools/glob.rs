//! `glob` tool

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use globset::{GlobBuilder, GlobMatcher};
use glassbox_core::Tool;
use glassbox_domain::constants::DEFAULT_GLOB_MAX_RESULTS;
use glassbox_domain::{AgentError, Result};
use serde_json::{json, Value};
use tracing::debug;
use walkdir::WalkDir;

use super::{io_error, max_results, optional_str, required_str, run_blocking};

/// Finds files whose path relative to a base directory matches a glob.
///
/// `*` stays within one path segment and `**` spans directories, so
/// `**/*.rs` matches Rust files at any depth, the base included.
#[derive(Debug, Default, Clone, Copy)]
pub struct GlobTool;

#[async_trait]
impl Tool for GlobTool {
    fn name(&self) -> &str {
        "glob"
    }

    fn description(&self) -> &str {
        "Find files matching a glob pattern. \
         Supports ** for recursive matching (e.g., '**/*.rs' for all Rust files). \
         Returns a list of matching file paths."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "pattern": {
                    "type": "string",
                    "description": "Glob pattern to match files (e.g., '**/*.rs', 'src/*.toml')"
                },
                "path": {
                    "type": "string",
                    "description": "Base directory to search from (default: current directory)",
                    "default": "."
                },
                "max_results": {
                    "type": "integer",
                    "description": "Maximum number of results to return",
                    "default": DEFAULT_GLOB_MAX_RESULTS
                }
            },
            "required": ["pattern"]
        })
    }

    async fn execute(&self, input: &Value) -> Result<String> {
        let pattern = required_str(input, "pattern")?;
        let matcher = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .map_err(|err| AgentError::InvalidInput(format!("invalid glob pattern: {err}")))?
            .compile_matcher();
        let limit = max_results(input, DEFAULT_GLOB_MAX_RESULTS)?;
        let root = PathBuf::from(optional_str(input, "path", ".")?);

        let metadata =
            tokio::fs::metadata(&root).await.map_err(|err| io_error(self.name(), &root, &err))?;
        if !metadata.is_dir() {
            return Err(AgentError::InvalidInput(format!("not a directory: {}", root.display())));
        }

        let mut files =
            run_blocking(self.name(), move || Ok(matching_files(&root, &matcher))).await?;
        files.sort();
        debug!(pattern, matches = files.len(), "glob finished");

        if files.is_empty() {
            return Ok(format!("No files found matching pattern: {pattern}"));
        }

        let truncated = files.len() > limit;
        files.truncate(limit);
        let mut output = files.join("\n");
        if truncated {
            output.push_str(&format!("\n\n[Results truncated at {limit} files]"));
        }
        Ok(output)
    }
}

fn matching_files(root: &Path, matcher: &GlobMatcher) -> Vec<String> {
    WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            let relative = entry.path().strip_prefix(root).ok()?;
            matcher.is_match(relative).then(|| relative.display().to_string())
        })
        .collect()
}
