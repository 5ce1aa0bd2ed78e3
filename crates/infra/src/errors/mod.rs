//! Mapping of external failures onto [`AgentError`](glassbox_domain::AgentError)

mod conversions;

pub use conversions::{status_error, InfraError};
