//! Remote strategy: delegate to an external prediction service, then re-rank
//! its raw probabilities into the same shape the local strategy produces.

use super::PredictionBackend;
use crate::error::{EngineError, PredictionFailure};
use crate::models::{BackendKind, MatchResult, SymptomQuery};
use crate::ranking::{by_score_then_name, confidence_for_position, validate_k};
use crate::scoring::{quantize, MAX_SCORE};

/// Description used when the service has none for a condition.
pub const FALLBACK_DESCRIPTION: &str = "No description available.";

/// Delimiter between symptom identifiers in the outbound request.
pub const SYMPTOM_DELIMITER: &str = ",";

/// Sentinels the service emits instead of omitting the field.
const NO_DESCRIPTION: &str = "No description";
const NO_PRECAUTIONS: &str = "No precautions";

/// One record as returned by the prediction service.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPrediction {
    pub condition: String,
    /// Percentage, 0–100.
    pub probability: f64,
    pub description: Option<String>,
    /// Comma-separated list, as the service sends it.
    pub precautions: Option<String>,
}

/// Transport seam for the prediction service.
pub trait PredictionClient: Send + Sync {
    /// Send comma-joined symptom identifiers, receive raw predictions.
    fn predict(&self, symptoms: &str) -> Result<Vec<RawPrediction>, PredictionFailure>;

    /// Where requests go, for logs.
    fn endpoint(&self) -> &str;
}

pub struct RemoteStrategy {
    client: Box<dyn PredictionClient>,
}

impl RemoteStrategy {
    pub fn new(client: Box<dyn PredictionClient>) -> Self {
        Self { client }
    }
}

impl PredictionBackend for RemoteStrategy {
    fn kind(&self) -> BackendKind {
        BackendKind::Remote
    }

    fn rank(&self, query: &SymptomQuery, k: usize) -> Result<Vec<MatchResult>, EngineError> {
        let k = validate_k(k)?;
        let symptoms = query.joined(SYMPTOM_DELIMITER);

        let raw = self.client.predict(&symptoms).map_err(|failure| {
            tracing::warn!(
                endpoint = self.client.endpoint(),
                error = %failure,
                "Remote prediction failed"
            );
            EngineError::PredictionUnavailable(failure)
        })?;

        let results = rerank(raw, k)?;
        tracing::debug!(matched = results.len(), k, "Remote ranking complete");
        Ok(results)
    }
}

/// Sort raw predictions by probability, keep the top `k`, tier by position.
pub fn rerank(raw: Vec<RawPrediction>, k: usize) -> Result<Vec<MatchResult>, EngineError> {
    let k = validate_k(k)?;

    for prediction in &raw {
        if prediction.condition.trim().is_empty() {
            return Err(
                PredictionFailure::Malformed("prediction without condition name".into()).into(),
            );
        }
        if !prediction.probability.is_finite() {
            return Err(PredictionFailure::Malformed(format!(
                "non-finite probability for {}",
                prediction.condition
            ))
            .into());
        }
    }

    let mut raw = raw;
    raw.sort_by(|a, b| {
        by_score_then_name(
            (quantize(a.probability), a.condition.as_str()),
            (quantize(b.probability), b.condition.as_str()),
        )
    });

    Ok(raw
        .into_iter()
        .take(k)
        .enumerate()
        .map(|(position, prediction)| MatchResult {
            name: prediction.condition.trim().to_string(),
            score: quantize(prediction.probability).clamp(0.0, MAX_SCORE),
            confidence: confidence_for_position(position),
            description: normalize_description(prediction.description.as_deref()),
            severity: None,
            precautions: split_precautions(prediction.precautions.as_deref()),
        })
        .collect())
}

/// Absent, blank, or "No description" all become the fixed fallback.
pub fn normalize_description(description: Option<&str>) -> String {
    match description.map(str::trim) {
        Some(text) if !text.is_empty() && !text.eq_ignore_ascii_case(NO_DESCRIPTION) => {
            text.to_string()
        }
        _ => FALLBACK_DESCRIPTION.to_string(),
    }
}

fn split_precautions(precautions: Option<&str>) -> Vec<String> {
    match precautions.map(str::trim) {
        Some(text) if !text.eq_ignore_ascii_case(NO_PRECAUTIONS) => text
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

/// Test client: returns a configurable response.
#[cfg(test)]
pub struct MockPredictionClient {
    response: Result<Vec<RawPrediction>, PredictionFailure>,
    last_request: std::sync::Mutex<Option<String>>,
}

#[cfg(test)]
impl MockPredictionClient {
    pub fn new(predictions: Vec<RawPrediction>) -> Self {
        Self {
            response: Ok(predictions),
            last_request: std::sync::Mutex::new(None),
        }
    }

    pub fn failing(failure: PredictionFailure) -> Self {
        Self {
            response: Err(failure),
            last_request: std::sync::Mutex::new(None),
        }
    }

    pub fn last_request(&self) -> Option<String> {
        self.last_request.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl PredictionClient for std::sync::Arc<MockPredictionClient> {
    fn predict(&self, symptoms: &str) -> Result<Vec<RawPrediction>, PredictionFailure> {
        *self.last_request.lock().unwrap() = Some(symptoms.to_string());
        self.response.clone()
    }

    fn endpoint(&self) -> &str {
        "mock://prediction"
    }
}

#[cfg(test)]
pub fn raw(condition: &str, probability: f64) -> RawPrediction {
    RawPrediction {
        condition: condition.into(),
        probability,
        description: Some(format!("{condition} description")),
        precautions: None,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::catalog::SymptomCatalog;
    use crate::models::{ConfidenceTier, SymptomContext};

    fn query(tokens: &[&str]) -> SymptomQuery {
        let catalog = SymptomCatalog::new(["fever", "cough", "runny nose"]).unwrap();
        SymptomQuery::new(
            tokens.iter().map(|t| catalog.normalize(t).unwrap()),
            SymptomContext::default(),
        )
        .unwrap()
    }

    // ── rerank ───────────────────────────────────────────

    #[test]
    fn resorts_by_probability_and_tiers_by_position() {
        let results = rerank(
            vec![raw("Flu", 70.0), raw("Cold", 90.0), raw("Allergy", 40.0)],
            3,
        )
        .unwrap();
        let summary: Vec<_> = results
            .iter()
            .map(|r| (r.name.as_str(), r.score, r.confidence))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("Cold", 90.0, ConfidenceTier::High),
                ("Flu", 70.0, ConfidenceTier::Medium),
                ("Allergy", 40.0, ConfidenceTier::Low),
            ]
        );
    }

    #[test]
    fn truncates_to_k() {
        let results = rerank(
            vec![raw("A", 10.0), raw("B", 20.0), raw("C", 30.0), raw("D", 40.0)],
            2,
        )
        .unwrap();
        let names: Vec<_> = results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["D", "C"]);
    }

    #[test]
    fn equal_probabilities_break_by_name() {
        let results = rerank(vec![raw("Beta", 50.0), raw("Alpha", 50.0)], 2).unwrap();
        assert_eq!(results[0].name, "Alpha");
        assert_eq!(results[1].name, "Beta");
    }

    #[test]
    fn probabilities_equal_at_reported_precision_break_by_name() {
        let results = rerank(vec![raw("Beta", 30.000000000000004), raw("Alpha", 30.0)], 2).unwrap();
        assert_eq!(results[0].name, "Alpha");
        assert_eq!(results[0].score, 30.0);
        assert_eq!(results[1].score, 30.0);
    }

    #[test]
    fn k_zero_is_rejected() {
        assert_eq!(
            rerank(vec![raw("A", 1.0)], 0).unwrap_err(),
            EngineError::InvalidK { k: 0 }
        );
    }

    #[test]
    fn non_finite_probability_is_malformed() {
        let err = rerank(vec![raw("A", f64::NAN)], 3).unwrap_err();
        assert!(matches!(
            err,
            EngineError::PredictionUnavailable(PredictionFailure::Malformed(_))
        ));
    }

    #[test]
    fn scores_are_clamped() {
        let results = rerank(vec![raw("A", 140.0), raw("B", -3.0)], 2).unwrap();
        assert_eq!(results[0].score, 100.0);
        assert_eq!(results[1].score, 0.0);
    }

    // ── descriptions & precautions ───────────────────────

    #[test]
    fn missing_descriptions_use_fallback() {
        assert_eq!(normalize_description(None), FALLBACK_DESCRIPTION);
        assert_eq!(normalize_description(Some("  ")), FALLBACK_DESCRIPTION);
        assert_eq!(normalize_description(Some("No description")), FALLBACK_DESCRIPTION);
        assert_eq!(normalize_description(Some(" A cold. ")), "A cold.");
    }

    #[test]
    fn precautions_are_split() {
        assert_eq!(
            split_precautions(Some("rest, drink fluids, ,see a doctor")),
            vec!["rest", "drink fluids", "see a doctor"]
        );
        assert!(split_precautions(Some("No precautions")).is_empty());
        assert!(split_precautions(None).is_empty());
    }

    // ── strategy ─────────────────────────────────────────

    #[test]
    fn sends_comma_joined_identifiers() {
        let client = Arc::new(MockPredictionClient::new(vec![raw("Cold", 90.0)]));
        let strategy = RemoteStrategy::new(Box::new(Arc::clone(&client)));
        let results = strategy.rank(&query(&["runny nose", "fever"]), 3).unwrap();

        assert_eq!(client.last_request().as_deref(), Some("fever,runny nose"));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].severity, None);
        assert_eq!(strategy.kind(), BackendKind::Remote);
    }

    #[test]
    fn client_failure_is_prediction_unavailable() {
        let client = Arc::new(MockPredictionClient::failing(PredictionFailure::Status {
            status: 500,
            body: "boom".into(),
        }));
        let strategy = RemoteStrategy::new(Box::new(client));
        let err = strategy.rank(&query(&["fever"]), 3).unwrap_err();
        assert_eq!(err.code(), "PREDICTION_UNAVAILABLE");
    }

    #[test]
    fn invalid_k_is_reported_before_calling_out() {
        let client = Arc::new(MockPredictionClient::new(vec![]));
        let strategy = RemoteStrategy::new(Box::new(Arc::clone(&client)));
        assert!(strategy.rank(&query(&["fever"]), 0).is_err());
        assert_eq!(client.last_request(), None);
    }
}
