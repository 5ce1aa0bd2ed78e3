//! Application constants
//!
//! Defaults shared by the configuration records, the Ollama adapter and the
//! local tools.

// LLM defaults
pub const DEFAULT_PROVIDER: &str = "ollama";
pub const DEFAULT_MODEL: &str = "llama3.1:8b";
pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

// Agent loop
pub const DEFAULT_MAX_ITERATIONS: u32 = 10;

// Tools
pub const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 30;
pub const MAX_LIST_ENTRIES: usize = 500;
pub const DEFAULT_GREP_MAX_RESULTS: usize = 50;
pub const DEFAULT_GLOB_MAX_RESULTS: usize = 100;
pub const TOOL_CALL_ID_PREFIX: &str = "call_";

// Channel naming
pub const TOOL_CHANNEL_PREFIX: &str = "tool_";
pub const LLM_CHANNEL_PREFIX: &str = "llm";

// Logging
pub const DEFAULT_LOG_LEVEL: &str = "info";
