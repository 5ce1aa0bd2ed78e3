//! The think/act/observe agent loop

pub mod history;
pub mod service;

pub use history::MessageHistory;
pub use service::Agent;
