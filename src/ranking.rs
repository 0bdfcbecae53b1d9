//! Ranking & tiering over the local knowledge base.
//!
//! Scores every condition, drops zero scores, orders by score descending
//! with ties broken by name ascending, keeps the top `k`, then labels each
//! result by its position: first is High, second Medium, the rest Low.

use std::cmp::Ordering;

use crate::error::EngineError;
use crate::models::{Condition, ConfidenceTier, MatchResult, SymptomQuery};
use crate::scoring::score;

/// Results returned when the caller does not ask for a specific count.
pub const DEFAULT_TOP_K: usize = 3;

/// Tier for the result at `position` (0-based) in a ranked list.
pub fn confidence_for_position(position: usize) -> ConfidenceTier {
    match position {
        0 => ConfidenceTier::High,
        1 => ConfidenceTier::Medium,
        _ => ConfidenceTier::Low,
    }
}

pub fn validate_k(k: usize) -> Result<usize, EngineError> {
    if k < 1 {
        return Err(EngineError::InvalidK { k });
    }
    Ok(k)
}

/// Score descending, then name ascending.
pub(crate) fn by_score_then_name(a: (f64, &str), b: (f64, &str)) -> Ordering {
    b.0.partial_cmp(&a.0)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.1.cmp(b.1))
}

struct ScoredCondition<'a> {
    condition: &'a Condition,
    score: f64,
}

/// Rank `conditions` against `query`, returning at most `k` matches.
///
/// Never padded: fewer than `k` non-zero scores means a shorter list.
pub fn rank(
    query: &SymptomQuery,
    conditions: &[Condition],
    k: usize,
) -> Result<Vec<MatchResult>, EngineError> {
    let k = validate_k(k)?;

    let mut candidates: Vec<ScoredCondition<'_>> = conditions
        .iter()
        .map(|condition| ScoredCondition {
            condition,
            score: score(query, condition),
        })
        .filter(|scored| scored.score > 0.0)
        .collect();

    candidates.sort_by(|a, b| {
        by_score_then_name(
            (a.score, a.condition.name.as_str()),
            (b.score, b.condition.name.as_str()),
        )
    });

    let results: Vec<MatchResult> = candidates
        .into_iter()
        .take(k)
        .enumerate()
        .map(|(position, scored)| MatchResult {
            name: scored.condition.name.clone(),
            score: scored.score,
            confidence: confidence_for_position(position),
            description: scored.condition.description.clone(),
            severity: scored.condition.severity,
            precautions: scored.condition.precautions.clone(),
        })
        .collect();

    tracing::debug!(
        conditions = conditions.len(),
        matched = results.len(),
        k,
        "Local ranking complete"
    );

    Ok(results)
}
