//! `grep` tool

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use globset::{Glob, GlobMatcher};
use glassbox_core::Tool;
use glassbox_domain::constants::DEFAULT_GREP_MAX_RESULTS;
use glassbox_domain::{AgentError, Result};
use regex::Regex;
use serde_json::{json, Value};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use super::{io_error, max_results, optional_str, required_str, run_blocking};

const BINARY_EXTENSIONS: &[&str] = &[
    "pyc", "pyo", "so", "dll", "exe", "bin", "jpg", "jpeg", "png", "gif", "ico", "bmp", "pdf",
    "zip", "tar", "gz", "7z", "rar", "mp3", "mp4", "avi", "mov", "wav", "woff", "woff2", "ttf",
    "eot",
];

/// Searches file contents line by line with a regular expression.
///
/// Directories are walked in name order with hidden entries skipped; files
/// with a binary extension or non-UTF-8 contents are ignored.
#[derive(Debug, Default, Clone, Copy)]
pub struct GrepTool;

#[async_trait]
impl Tool for GrepTool {
    fn name(&self) -> &str {
        "grep"
    }

    fn description(&self) -> &str {
        "Search for a pattern in files using regular expressions. \
         Returns matching lines with file paths and line numbers. \
         Use include parameter to filter by file name (e.g., '*.rs')."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "pattern": {
                    "type": "string",
                    "description": "Regular expression pattern to search for"
                },
                "path": {
                    "type": "string",
                    "description": "Directory or file to search in (default: current directory)",
                    "default": "."
                },
                "include": {
                    "type": "string",
                    "description": "Glob pattern to filter files (e.g., '*.rs', '*.toml')"
                },
                "max_results": {
                    "type": "integer",
                    "description": "Maximum number of results to return",
                    "default": DEFAULT_GREP_MAX_RESULTS
                }
            },
            "required": ["pattern"]
        })
    }

    async fn execute(&self, input: &Value) -> Result<String> {
        let pattern = required_str(input, "pattern")?;
        let regex = Regex::new(pattern)
            .map_err(|err| AgentError::InvalidInput(format!("invalid regex pattern: {err}")))?;
        let include = match optional_str(input, "include", "")? {
            "" => None,
            glob => Some(Glob::new(glob).map_err(invalid_include)?.compile_matcher()),
        };
        let limit = max_results(input, DEFAULT_GREP_MAX_RESULTS)?;
        let root = PathBuf::from(optional_str(input, "path", ".")?);

        tokio::fs::metadata(&root).await.map_err(|err| io_error(self.name(), &root, &err))?;

        let matches = run_blocking(self.name(), move || {
            Ok(search(&root, &regex, include.as_ref(), limit))
        })
        .await?;
        debug!(pattern, matches = matches.len(), "grep finished");

        if matches.is_empty() {
            return Ok(format!("No matches found for pattern: {pattern}"));
        }

        let mut output = matches.join("\n");
        if matches.len() == limit {
            output.push_str(&format!("\n\n[Results truncated at {limit} matches]"));
        }
        Ok(output)
    }
}

fn search(root: &Path, regex: &Regex, include: Option<&GlobMatcher>, limit: usize) -> Vec<String> {
    let mut results = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));

    for entry in walker.filter_map(std::result::Result::ok) {
        if !entry.file_type().is_file() || has_binary_extension(entry.path()) {
            continue;
        }
        if entry.depth() > 0 && include.is_some_and(|glob| !glob.is_match(entry.file_name())) {
            continue;
        }
        let Ok(content) = std::fs::read_to_string(entry.path()) else {
            continue;
        };

        let shown = entry
            .path()
            .strip_prefix(root)
            .ok()
            .filter(|relative| !relative.as_os_str().is_empty())
            .unwrap_or_else(|| entry.path());

        for (index, line) in content.lines().enumerate() {
            if !regex.is_match(line) {
                continue;
            }
            results.push(format!("{}:{}: {}", shown.display(), index + 1, line.trim()));
            if results.len() >= limit {
                return results;
            }
        }
    }

    results
}

fn invalid_include(err: globset::Error) -> AgentError {
    AgentError::InvalidInput(format!("invalid include pattern: {err}"))
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_str().is_some_and(|name| name.starts_with('.'))
}

fn has_binary_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| BINARY_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}
