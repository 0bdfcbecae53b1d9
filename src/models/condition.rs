use std::collections::BTreeMap;

use serde::Serialize;

use super::enums::SeverityTier;
use super::symptom::Symptom;

/// A knowledge-base entry: a condition and its characteristic symptoms.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Condition {
    pub name: String,
    /// Symptom → weight, every weight in (0, 1].
    pub symptoms: BTreeMap<Symptom, f64>,
    pub description: String,
    pub severity: Option<SeverityTier>,
    pub precautions: Vec<String>,
}

impl Condition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        symptoms: BTreeMap<Symptom, f64>,
    ) -> Self {
        Self {
            name: name.into(),
            symptoms,
            description: description.into(),
            severity: None,
            precautions: Vec::new(),
        }
    }

    pub fn with_severity(mut self, severity: SeverityTier) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn with_precautions(mut self, precautions: Vec<String>) -> Self {
        self.precautions = precautions;
        self
    }

    /// Sum of all symptom weights.
    pub fn total_weight(&self) -> f64 {
        self.symptoms.values().sum()
    }
}
