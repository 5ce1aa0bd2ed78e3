//! Mapping of resilience failures back onto the agent error type

use glassbox_common::resilience::ResilienceError;
use glassbox_domain::AgentError;

/// Collapse a terminal resilience failure into an [`AgentError`].
///
/// A critical abort hands back the original error so that callers further
/// out (an outer fallback chain, the agent loop) still see it as critical.
/// Everything else becomes [`AgentError::Unavailable`] carrying the rendered
/// causal chain, which is never retryable.
pub fn flatten_resilience_error(err: ResilienceError<AgentError>) -> AgentError {
    match err {
        ResilienceError::Aborted { source, .. } => source,
        other => AgentError::Unavailable(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use glassbox_common::error::ErrorClassification;
    use glassbox_common::resilience::Tier;

    use super::*;

    #[test]
    fn test_abort_keeps_critical_source() {
        let err = ResilienceError::Aborted {
            tier: Tier::Fallback(1),
            source: AgentError::Security("escape".into()),
        };

        let flattened = flatten_resilience_error(err);
        assert_eq!(flattened, AgentError::Security("escape".into()));
        assert!(flattened.is_critical());
    }

    #[test]
    fn test_circuit_open_becomes_unavailable() {
        let err: ResilienceError<AgentError> = ResilienceError::CircuitOpen {
            channel: "llm:ollama:llama3.1:8b".into(),
            retry_in: Duration::from_secs(12),
        };

        let flattened = flatten_resilience_error(err);
        assert!(matches!(
            &flattened,
            AgentError::Unavailable(text) if text.contains("llm:ollama:llama3.1:8b")
        ));
        assert!(!flattened.is_retryable());
    }

    #[test]
    fn test_exhaustion_keeps_rendered_chain() {
        let err = ResilienceError::RetriesExhausted {
            channel: "tool_read_file".into(),
            attempts: 4,
            source: AgentError::Network("reset".into()),
        };

        assert_eq!(
            flatten_resilience_error(err).to_string(),
            "Unavailable: 'tool_read_file' failed after 4 attempts: Network error: reset"
        );
    }
}
