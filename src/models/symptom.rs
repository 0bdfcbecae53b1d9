use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::enums::{DurationBucket, Gender};
use crate::error::EngineError;

/// Catalog-unique symptom identifier in normalized form.
///
/// Only the `SymptomCatalog` hands these out, so a `Symptom` in hand always
/// names a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Symptom(String);

impl Symptom {
    pub(crate) fn from_normalized(id: String) -> Self {
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symptom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Symptom {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Optional context collected alongside the symptoms.
///
/// Accepted and validated, but not consulted by scoring.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomContext {
    #[serde(default, deserialize_with = "deserialize_duration")]
    pub duration: Option<DurationBucket>,
    /// Self-rated severity, 1 (mild) to 10 (severe).
    #[serde(default)]
    pub severity: Option<u8>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<Gender>,
}

/// Duration by wire name or by the picker's display label (`"<1 day"`).
fn deserialize_duration<'de, D>(deserializer: D) -> Result<Option<DurationBucket>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|raw| DurationBucket::parse(&raw).map_err(serde::de::Error::custom))
        .transpose()
}

pub const MIN_SEVERITY: u8 = 1;
pub const MAX_SEVERITY: u8 = 10;

impl SymptomContext {
    pub fn validate(&self) -> Result<(), EngineError> {
        if let Some(severity) = self.severity {
            if !(MIN_SEVERITY..=MAX_SEVERITY).contains(&severity) {
                return Err(EngineError::InvalidContext(format!(
                    "severity must be between {MIN_SEVERITY} and {MAX_SEVERITY} (got {severity})"
                )));
            }
        }
        Ok(())
    }
}

/// A validated, non-empty set of symptoms plus context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymptomQuery {
    symptoms: BTreeSet<Symptom>,
    context: SymptomContext,
}

impl SymptomQuery {
    /// Build a query. Duplicates collapse; an empty set is `EmptyQuery`.
    pub fn new(
        symptoms: impl IntoIterator<Item = Symptom>,
        context: SymptomContext,
    ) -> Result<Self, EngineError> {
        let symptoms: BTreeSet<Symptom> = symptoms.into_iter().collect();
        if symptoms.is_empty() {
            return Err(EngineError::EmptyQuery);
        }
        context.validate()?;
        Ok(Self { symptoms, context })
    }

    pub fn symptoms(&self) -> &BTreeSet<Symptom> {
        &self.symptoms
    }

    pub fn contains(&self, symptom: &Symptom) -> bool {
        self.symptoms.contains(symptom)
    }

    pub fn context(&self) -> &SymptomContext {
        &self.context
    }

    pub fn len(&self) -> usize {
        self.symptoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symptoms.is_empty()
    }

    /// Identifiers joined with `delimiter`, in sorted order.
    pub fn joined(&self, delimiter: &str) -> String {
        self.symptoms
            .iter()
            .map(Symptom::as_str)
            .collect::<Vec<_>>()
            .join(delimiter)
    }
}
