use super::{LocalStrategy, PredictionBackend, RemoteStrategy};
use crate::error::EngineError;
use crate::models::{BackendKind, MatchResult, SymptomQuery};

/// Remote first, local when the remote is unavailable.
///
/// Only built when the configuration opts in. The two strategies can
/// disagree, so every fallback is logged.
pub struct FallbackStrategy {
    remote: RemoteStrategy,
    local: LocalStrategy,
}

impl FallbackStrategy {
    pub fn new(remote: RemoteStrategy, local: LocalStrategy) -> Self {
        Self { remote, local }
    }
}

impl PredictionBackend for FallbackStrategy {
    fn kind(&self) -> BackendKind {
        BackendKind::Remote
    }

    fn rank(&self, query: &SymptomQuery, k: usize) -> Result<Vec<MatchResult>, EngineError> {
        match self.remote.rank(query, k) {
            Err(EngineError::PredictionUnavailable(failure)) => {
                tracing::warn!(
                    error = %failure,
                    "Remote prediction unavailable, falling back to local knowledge base"
                );
                self.local.rank(query, k)
            }
            other => other,
        }
    }
}
