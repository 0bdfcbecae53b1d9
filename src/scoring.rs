//! Weighted-recall match score between a query and one condition.
//!
//! score = 100 × (weight of the condition's symptoms the query covers)
//!             / (total weight of the condition's symptoms)
//!
//! Extra query symptoms the condition does not list never lower the score:
//! user-reported input is noisy. This is deliberately not Jaccard.

use crate::models::{Condition, SymptomQuery};

pub const MAX_SCORE: f64 = 100.0;

/// Scores are reported, and compared, at six decimal places.
const SCORE_SCALE: f64 = 1e6;

/// Round `raw` to the reported precision so that mathematically equal scores
/// built from different weight sums compare equal.
pub fn quantize(raw: f64) -> f64 {
    (raw * SCORE_SCALE).round() / SCORE_SCALE
}

/// Match score in [0, 100]. Exactly 0 iff the query covers none of the
/// condition's symptoms.
pub fn score(query: &SymptomQuery, condition: &Condition) -> f64 {
    let total = condition.total_weight();
    if total <= 0.0 {
        return 0.0;
    }

    let covered: f64 = condition
        .symptoms
        .iter()
        .filter(|(symptom, _)| query.contains(symptom))
        .map(|(_, weight)| weight)
        .sum();

    quantize(MAX_SCORE * covered / total).clamp(0.0, MAX_SCORE)
}
