//! Prediction Backend Adapter.
//!
//! Two interchangeable strategies behind one trait: `LocalStrategy` scores
//! against the in-process knowledge base, `RemoteStrategy` asks an external
//! prediction service and re-ranks its answer. Callers see the same
//! `rank(query, k)` either way.

pub mod fallback;
pub mod http;
pub mod local;
pub mod remote;

use std::sync::Arc;

pub use fallback::FallbackStrategy;
pub use http::HttpPredictionClient;
pub use local::LocalStrategy;
pub use remote::{PredictionClient, RawPrediction, RemoteStrategy};

use crate::config::{ConfigError, EngineConfig};
use crate::error::{EngineError, StartupError};
use crate::knowledge_base::KnowledgeBase;
use crate::models::{BackendKind, MatchResult, SymptomQuery};

/// One ranking strategy. Implementations must be safe to share across threads.
pub trait PredictionBackend: Send + Sync {
    fn kind(&self) -> BackendKind;

    /// Rank `query`, returning at most `k` results, best first.
    fn rank(&self, query: &SymptomQuery, k: usize) -> Result<Vec<MatchResult>, EngineError>;
}

/// Build the backend the configuration asks for.
///
/// Must run outside an async context: the remote client is blocking.
pub fn build_backend(
    config: &EngineConfig,
    knowledge_base: Arc<KnowledgeBase>,
) -> Result<Arc<dyn PredictionBackend>, StartupError> {
    let backend: Arc<dyn PredictionBackend> = match config.backend {
        BackendKind::Local => Arc::new(LocalStrategy::new(knowledge_base)),
        BackendKind::Remote => {
            let url = config
                .prediction_url
                .as_deref()
                .ok_or(ConfigError::MissingPredictionUrl)?;
            let client = HttpPredictionClient::new(url, config.request_timeout)?;
            let remote = RemoteStrategy::new(Box::new(client));

            if config.fallback_to_local {
                tracing::info!(url, "Remote prediction enabled with local fallback");
                Arc::new(FallbackStrategy::new(
                    remote,
                    LocalStrategy::new(knowledge_base),
                ))
            } else {
                tracing::info!(url, "Remote prediction enabled");
                Arc::new(remote)
            }
        }
    };
    Ok(backend)
}
