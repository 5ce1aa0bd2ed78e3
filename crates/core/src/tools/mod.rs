//! Tool port, registry and channel naming

pub mod ports;
pub mod registry;

use glassbox_domain::constants::TOOL_CHANNEL_PREFIX;

/// Executor channel for one tool, `tool_<name>`.
pub fn tool_channel(name: &str) -> String {
    format!("{TOOL_CHANNEL_PREFIX}{name}")
}
