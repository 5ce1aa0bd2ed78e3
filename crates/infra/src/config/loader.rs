//! Configuration loader
//!
//! Loads application configuration from files and environment variables.
//!
//! ## Loading Strategy
//! 1. Use the explicit file when one is given, otherwise probe standard
//!    locations
//! 2. Fall back to built-in defaults when no file exists
//! 3. Apply `GLASSBOX_*` (and `OLLAMA_BASE_URL`) environment overrides
//! 4. Supports JSON and TOML formats; every field is optional
//!
//! ## Environment Variables
//! - `GLASSBOX_PROVIDER`: LLM provider name
//! - `GLASSBOX_MODEL`: Primary model
//! - `GLASSBOX_FALLBACK_MODELS`: Comma-separated fallback models
//! - `GLASSBOX_MAX_ITERATIONS`: Agent loop iteration budget
//! - `GLASSBOX_MAX_RETRIES`: Retries per resilient call
//! - `GLASSBOX_LOG_LEVEL`: Default log filter
//! - `GLASSBOX_LOG_JSON`: JSON log output (true/false)
//! - `OLLAMA_BASE_URL`: Ollama server URL
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./glassbox.toml`, `./glassbox.json`, `./config.toml`, `./config.json`
//! 2. The same names in the parent and grandparent directories
//! 3. The same names next to the executable

use std::path::{Path, PathBuf};
use std::str::FromStr;

use glassbox_domain::{AgentError, Config, Result};

const CONFIG_FILE_NAMES: [&str; 4] =
    ["glassbox.toml", "glassbox.json", "config.toml", "config.json"];

/// Load configuration with automatic fallback strategy
///
/// Reads `path` when given, otherwise the first probed config file, otherwise
/// the defaults; then applies environment overrides.
///
/// # Errors
/// Returns `AgentError::Config` if:
/// - An explicit file does not exist
/// - The file format is invalid
/// - An environment override cannot be parsed
pub fn load(path: Option<PathBuf>) -> Result<Config> {
    let mut config = match path {
        Some(path) => load_from_file(Some(path))?,
        None => match probe_config_paths() {
            Some(found) => load_from_file(Some(found))?,
            None => {
                tracing::debug!("No config file found, using defaults");
                Config::default()
            }
        },
    };

    apply_env_overrides(&mut config)?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `AgentError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(AgentError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            AgentError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| AgentError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| AgentError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| AgentError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(AgentError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.extend(cwd.ancestors().take(3).map(Path::to_path_buf));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.push(exe_dir.to_path_buf());
        }
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.is_file())
}

/// Apply environment variable overrides on top of `config`.
///
/// # Errors
/// Returns `AgentError::Config` when a numeric or boolean variable does not
/// parse.
pub fn apply_env_overrides(config: &mut Config) -> Result<()> {
    if let Some(provider) = env_string("GLASSBOX_PROVIDER") {
        config.llm.provider = provider;
    }
    if let Some(model) = env_string("GLASSBOX_MODEL") {
        config.llm.model = model;
    }
    if let Some(models) = env_string("GLASSBOX_FALLBACK_MODELS") {
        config.llm.fallback_models = split_list(&models);
    }
    if let Some(base_url) = env_string("OLLAMA_BASE_URL") {
        config.llm.base_url = base_url;
    }
    if let Some(iterations) = env_parse("GLASSBOX_MAX_ITERATIONS")? {
        config.agent.max_iterations = iterations;
    }
    if let Some(retries) = env_parse("GLASSBOX_MAX_RETRIES")? {
        config.resilience.max_retries = retries;
    }
    if let Some(level) = env_string("GLASSBOX_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(json) = env_bool("GLASSBOX_LOG_JSON")? {
        config.logging.json = json;
    }

    Ok(())
}

/// Non-empty environment variable, trimmed
fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_string(key)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| AgentError::Config(format!("Invalid value for {key}: {e}")))
        })
        .transpose()
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str) -> Result<Option<bool>> {
    env_string(key)
        .map(|raw| match raw.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(AgentError::Config(format!("Invalid boolean for {key}: {raw}"))),
        })
        .transpose()
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use once_cell::sync::Lazy;
    use tempfile::NamedTempFile;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const OVERRIDE_VARS: [&str; 8] = [
        "GLASSBOX_PROVIDER",
        "GLASSBOX_MODEL",
        "GLASSBOX_FALLBACK_MODELS",
        "GLASSBOX_MAX_ITERATIONS",
        "GLASSBOX_MAX_RETRIES",
        "GLASSBOX_LOG_LEVEL",
        "GLASSBOX_LOG_JSON",
        "OLLAMA_BASE_URL",
    ];

    fn clear_overrides() {
        for key in OVERRIDE_VARS {
            std::env::remove_var(key);
        }
    }

    fn temp_config(contents: &str, extension: &str) -> PathBuf {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(contents.as_bytes()).unwrap();
        let path = temp_file.path().with_extension(extension);
        std::fs::copy(temp_file.path(), &path).unwrap();
        path
    }

    #[test]
    fn test_env_bool_parsing() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");

        for value in ["1", "true", "yes", "on", "TRUE"] {
            std::env::set_var("GLASSBOX_TEST_BOOL", value);
            assert_eq!(env_bool("GLASSBOX_TEST_BOOL").unwrap(), Some(true), "{value}");
        }
        for value in ["0", "false", "no", "off"] {
            std::env::set_var("GLASSBOX_TEST_BOOL", value);
            assert_eq!(env_bool("GLASSBOX_TEST_BOOL").unwrap(), Some(false), "{value}");
        }

        std::env::set_var("GLASSBOX_TEST_BOOL", "maybe");
        assert!(env_bool("GLASSBOX_TEST_BOOL").is_err());

        std::env::remove_var("GLASSBOX_TEST_BOOL");
        assert_eq!(env_bool("GLASSBOX_TEST_BOOL").unwrap(), None);
    }

    #[test]
    fn test_env_overrides_apply() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_overrides();

        std::env::set_var("GLASSBOX_MODEL", "qwen2.5:7b");
        std::env::set_var("GLASSBOX_FALLBACK_MODELS", "mistral:7b, llama3.2:3b,,");
        std::env::set_var("GLASSBOX_MAX_ITERATIONS", "4");
        std::env::set_var("GLASSBOX_MAX_RETRIES", "1");
        std::env::set_var("GLASSBOX_LOG_JSON", "on");
        std::env::set_var("OLLAMA_BASE_URL", "http://gpu-box:11434");

        let mut config = Config::default();
        apply_env_overrides(&mut config).unwrap();

        assert_eq!(config.llm.model, "qwen2.5:7b");
        assert_eq!(config.llm.fallback_models, vec!["mistral:7b", "llama3.2:3b"]);
        assert_eq!(config.llm.base_url, "http://gpu-box:11434");
        assert_eq!(config.agent.max_iterations, 4);
        assert_eq!(config.resilience.max_retries, 1);
        assert!(config.logging.json);
        assert_eq!(config.llm.provider, "ollama");

        clear_overrides();
    }

    #[test]
    fn test_env_override_invalid_number() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_overrides();

        std::env::set_var("GLASSBOX_MAX_RETRIES", "lots");
        let err = apply_env_overrides(&mut Config::default()).unwrap_err();
        assert!(matches!(err, AgentError::Config(msg) if msg.contains("GLASSBOX_MAX_RETRIES")));

        clear_overrides();
    }

    #[test]
    fn test_load_explicit_file_then_env() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_overrides();

        let path = temp_config(
            r#"
[llm]
model = "codellama:13b"

[agent]
max_iterations = 7
"#,
            "toml",
        );
        std::env::set_var("GLASSBOX_MAX_ITERATIONS", "2");

        let config = load(Some(path.clone())).unwrap();
        assert_eq!(config.llm.model, "codellama:13b");
        assert_eq!(config.agent.max_iterations, 2);

        clear_overrides();
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_json() {
        let path = temp_config(
            r#"{
                "llm": { "fallback_models": ["mistral:7b"] },
                "resilience": { "failure_threshold": 2, "recovery_timeout": 5.5 }
            }"#,
            "json",
        );

        let config = load_from_file(Some(path.clone())).unwrap();
        assert_eq!(config.llm.fallback_models, vec!["mistral:7b"]);
        assert_eq!(config.resilience.failure_threshold, 2);
        assert!((config.resilience.recovery_timeout - 5.5).abs() < f64::EPSILON);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_not_found() {
        let result = load_from_file(Some(PathBuf::from("/nonexistent/glassbox.toml")));
        assert!(matches!(result, Err(AgentError::Config(_))));
    }

    #[test]
    fn test_load_from_file_invalid_json() {
        let path = temp_config(r#"{ "this is": "not valid json" "#, "json");

        let result = load_from_file(Some(path.clone()));
        assert!(matches!(result, Err(AgentError::Config(msg)) if msg.starts_with("Invalid JSON")));

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_parse_config_empty_toml_is_default() {
        let config = parse_config("", Path::new("glassbox.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_parse_config_unsupported_format() {
        let result = parse_config("some content", Path::new("glassbox.yaml"));
        assert!(result.is_err(), "Should fail with unsupported format");
    }
}
