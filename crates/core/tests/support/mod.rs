//! Shared test helpers for `glassbox-core` integration tests.
//!
//! Scripted LLM clients and in-memory tools so that agent tests can focus
//! on loop behaviour instead of boilerplate.

#![allow(dead_code)]

pub mod llm;
pub mod tools;

use std::sync::Arc;
use std::time::Duration;

use glassbox_common::resilience::{ResilienceConfig, ResilientExecutor};

/// Executor with no backoff delay and no jitter.
pub fn instant_executor(max_retries: u32) -> Arc<ResilientExecutor> {
    let config = ResilienceConfig::builder()
        .max_retries(max_retries)
        .base_delay(Duration::ZERO)
        .max_delay(Duration::ZERO)
        .no_jitter()
        .build()
        .expect("valid test config");
    Arc::new(ResilientExecutor::new(config).expect("valid test config"))
}
