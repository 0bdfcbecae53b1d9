//! Error taxonomy shared by the engine, the prediction backends and startup.
//!
//! `EngineError` kinds are what callers branch on. `code()` gives the stable
//! machine-readable name the HTTP layer forwards to clients.

use std::time::Duration;

use thiserror::Error;

use crate::config::ConfigError;
use crate::knowledge_base::KnowledgeBaseError;

/// Why the remote prediction service could not produce a ranking.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PredictionFailure {
    #[error("prediction service is not reachable at {0}")]
    Connection(String),

    #[error("prediction request timed out after {0:?}")]
    Timeout(Duration),

    #[error("prediction request failed: {0}")]
    Request(String),

    #[error("prediction service returned error (status {status}): {body}")]
    Status { status: u16, body: String },

    #[error("malformed prediction response: {0}")]
    Malformed(String),

    #[error("prediction worker failed: {0}")]
    Worker(String),
}

/// Errors returned by a ranking call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("unknown symptom: {token:?}")]
    UnknownSymptom { token: String },

    #[error("no symptoms supplied")]
    EmptyQuery,

    #[error("k must be at least 1 (got {k})")]
    InvalidK { k: usize },

    #[error("invalid query context: {0}")]
    InvalidContext(String),

    #[error("prediction unavailable: {0}")]
    PredictionUnavailable(#[from] PredictionFailure),
}

impl EngineError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownSymptom { .. } => "UNKNOWN_SYMPTOM",
            Self::EmptyQuery => "EMPTY_QUERY",
            Self::InvalidK { .. } => "INVALID_K",
            Self::InvalidContext(_) => "INVALID_CONTEXT",
            Self::PredictionUnavailable(_) => "PREDICTION_UNAVAILABLE",
        }
    }
}

/// Failures while bringing the service up.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("knowledge base error: {0}")]
    KnowledgeBase(#[from] KnowledgeBaseError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct_per_kind() {
        let errors = [
            EngineError::UnknownSymptom { token: "x".into() },
            EngineError::EmptyQuery,
            EngineError::InvalidK { k: 0 },
            EngineError::InvalidContext("severity".into()),
            EngineError::PredictionUnavailable(PredictionFailure::Timeout(Duration::from_secs(5))),
        ];
        let mut codes: Vec<_> = errors.iter().map(EngineError::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn timeout_message_keeps_sub_second_precision() {
        let failure = PredictionFailure::Timeout(Duration::from_millis(100));
        assert_eq!(failure.to_string(), "prediction request timed out after 100ms");
    }

    #[test]
    fn unknown_symptom_message_names_token() {
        let err = EngineError::UnknownSymptom { token: "unknown_token".into() };
        assert!(err.to_string().contains("unknown_token"));
    }
}
