use serde::{Deserialize, Serialize};

use super::enums::{ConfidenceTier, SeverityTier};

/// One ranked candidate condition, as returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub name: String,
    /// Match score, 0–100 inclusive.
    pub score: f64,
    /// Assigned by rank position, not by score.
    pub confidence: ConfidenceTier,
    pub description: String,
    #[serde(default)]
    pub severity: Option<SeverityTier>,
    #[serde(default)]
    pub precautions: Vec<String>,
}
