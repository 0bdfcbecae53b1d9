use std::sync::Arc;

use super::PredictionBackend;
use crate::error::EngineError;
use crate::knowledge_base::KnowledgeBase;
use crate::models::{BackendKind, MatchResult, SymptomQuery};
use crate::ranking;

/// Scores the query against the in-process knowledge base.
pub struct LocalStrategy {
    knowledge_base: Arc<KnowledgeBase>,
}

impl LocalStrategy {
    pub fn new(knowledge_base: Arc<KnowledgeBase>) -> Self {
        Self { knowledge_base }
    }
}

impl PredictionBackend for LocalStrategy {
    fn kind(&self) -> BackendKind {
        BackendKind::Local
    }

    fn rank(&self, query: &SymptomQuery, k: usize) -> Result<Vec<MatchResult>, EngineError> {
        ranking::rank(query, self.knowledge_base.all_conditions(), k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge_base::load_from_str;
    use crate::models::{ConfidenceTier, SymptomContext};

    #[test]
    fn ranks_against_knowledge_base() {
        let loaded = load_from_str(
            r#"{"symptoms": ["fever", "cough", "rash"], "conditions": [
                {"name": "A", "description": "a", "symptoms": {"fever": 0.6, "cough": 0.4}},
                {"name": "B", "description": "b", "symptoms": {"fever": 0.5, "rash": 0.5}}
            ]}"#,
        )
        .unwrap();
        let strategy = LocalStrategy::new(Arc::new(loaded.knowledge_base));
        let query = SymptomQuery::new(
            ["fever", "cough"].iter().map(|t| loaded.catalog.normalize(t).unwrap()),
            SymptomContext::default(),
        )
        .unwrap();

        let results = strategy.rank(&query, 2).unwrap();
        assert_eq!(strategy.kind(), BackendKind::Local);
        assert_eq!(results[0].name, "A");
        assert_eq!(results[0].confidence, ConfidenceTier::High);
        assert_eq!(results[1].name, "B");
        assert_eq!(results[1].confidence, ConfidenceTier::Medium);
    }
}
