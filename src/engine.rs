//! Engine facade: the single entry point the UI layer calls.
//!
//! Normalizes raw tokens through the catalog, builds the query, and hands it
//! to whichever backend is configured. Holds only read-only snapshots, so one
//! instance serves any number of concurrent callers.

use std::sync::Arc;

use crate::catalog::{NormalizeError, SymptomCatalog};
use crate::error::EngineError;
use crate::knowledge_base::KnowledgeBase;
use crate::models::{BackendKind, MatchResult, Symptom, SymptomContext, SymptomQuery};
use crate::prediction::PredictionBackend;
use crate::ranking::{validate_k, DEFAULT_TOP_K};

pub struct SymptomEngine {
    catalog: Arc<SymptomCatalog>,
    knowledge_base: Arc<KnowledgeBase>,
    backend: Arc<dyn PredictionBackend>,
    default_k: usize,
}

impl SymptomEngine {
    pub fn new(
        catalog: Arc<SymptomCatalog>,
        knowledge_base: Arc<KnowledgeBase>,
        backend: Arc<dyn PredictionBackend>,
    ) -> Self {
        Self {
            catalog,
            knowledge_base,
            backend,
            default_k: DEFAULT_TOP_K,
        }
    }

    /// Override the result count used when a caller passes no `k`.
    pub fn with_default_k(mut self, k: usize) -> Result<Self, EngineError> {
        self.default_k = validate_k(k)?;
        Ok(self)
    }

    /// Rank raw symptom tokens.
    ///
    /// Every token must normalize to a catalog entry; the first that does not
    /// is reported as `UnknownSymptom` and nothing is ranked.
    pub fn rank<S: AsRef<str>>(
        &self,
        symptoms: &[S],
        context: SymptomContext,
        k: Option<usize>,
    ) -> Result<Vec<MatchResult>, EngineError> {
        let k = validate_k(k.unwrap_or(self.default_k))?;
        let query = self.build_query(symptoms, context)?;
        self.rank_query(&query, k)
    }

    /// Rank an already-built query.
    pub fn rank_query(
        &self,
        query: &SymptomQuery,
        k: usize,
    ) -> Result<Vec<MatchResult>, EngineError> {
        tracing::debug!(
            backend = %self.backend.kind(),
            symptoms = query.len(),
            k,
            "Ranking query"
        );
        self.backend.rank(query, k)
    }

    /// Normalize every token and assemble a query.
    pub fn build_query<S: AsRef<str>>(
        &self,
        symptoms: &[S],
        context: SymptomContext,
    ) -> Result<SymptomQuery, EngineError> {
        if symptoms.is_empty() {
            return Err(EngineError::EmptyQuery);
        }

        let normalized = symptoms
            .iter()
            .map(|raw| self.normalize(raw.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        SymptomQuery::new(normalized, context)
    }

    /// Normalize one token, mapping lookup failures onto `UnknownSymptom`.
    pub fn normalize(&self, raw: &str) -> Result<Symptom, EngineError> {
        self.catalog.normalize(raw).map_err(|e| match e {
            NormalizeError::Blank => EngineError::UnknownSymptom {
                token: raw.to_string(),
            },
            NormalizeError::NotFound(token) => EngineError::UnknownSymptom { token },
        })
    }

    /// Search-as-you-type suggestions, in catalog order.
    pub fn suggest(&self, prefix: &str, limit: usize) -> Vec<Symptom> {
        self.catalog.suggest(prefix, limit)
    }

    pub fn catalog(&self) -> &SymptomCatalog {
        &self.catalog
    }

    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.knowledge_base
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    pub fn default_k(&self) -> usize {
        self.default_k
    }
}
