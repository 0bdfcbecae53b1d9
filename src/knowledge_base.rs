//! Condition Knowledge Base: conditions and their weighted symptoms.
//!
//! Loaded once at startup from a JSON document that also carries the symptom
//! catalog and synonym table. Read-only afterwards; a new snapshot means a
//! restart.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::catalog::{CatalogError, SymptomCatalog};
use crate::models::{Condition, SeverityTier};

#[derive(Debug, Error)]
pub enum KnowledgeBaseError {
    #[error(
        "cannot read knowledge base {path}: {source} \
         (set SYMPTOM_CHECKER_KNOWLEDGE_BASE to use another file)"
    )]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("knowledge base is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid symptom catalog: {0}")]
    Catalog(#[from] CatalogError),

    #[error("condition name is blank")]
    BlankConditionName,

    #[error("duplicate condition: {0}")]
    DuplicateCondition(String),

    #[error("condition {0:?} lists no symptoms")]
    NoSymptoms(String),

    #[error("condition {condition:?} references unknown symptom {symptom:?}")]
    UnknownSymptom { condition: String, symptom: String },

    #[error("condition {condition:?} lists symptom {symptom:?} twice")]
    DuplicateSymptom { condition: String, symptom: String },

    #[error("condition {condition:?}: weight {weight} for {symptom:?} is outside (0, 1]")]
    InvalidWeight {
        condition: String,
        symptom: String,
        weight: f64,
    },
}

// ═══════════════════════════════════════════════════════════
// On-disk shape
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
struct KnowledgeBaseFile {
    symptoms: Vec<String>,
    #[serde(default)]
    synonyms: BTreeMap<String, String>,
    conditions: Vec<ConditionRecord>,
}

#[derive(Debug, Deserialize)]
struct ConditionRecord {
    name: String,
    description: String,
    #[serde(default)]
    severity: Option<SeverityTier>,
    #[serde(default)]
    precautions: Vec<String>,
    /// Keyed by catalog label or synonym.
    symptoms: BTreeMap<String, f64>,
}

// ═══════════════════════════════════════════════════════════
// Snapshot
// ═══════════════════════════════════════════════════════════

/// Immutable set of conditions. Exposes no mutation.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    conditions: Vec<Condition>,
}

impl KnowledgeBase {
    /// Validate and wrap a list of conditions.
    pub fn new(conditions: Vec<Condition>) -> Result<Self, KnowledgeBaseError> {
        let mut seen = HashSet::new();
        for condition in &conditions {
            let name = condition.name.trim();
            if name.is_empty() {
                return Err(KnowledgeBaseError::BlankConditionName);
            }
            if !seen.insert(name.to_string()) {
                return Err(KnowledgeBaseError::DuplicateCondition(name.to_string()));
            }
            if condition.symptoms.is_empty() {
                return Err(KnowledgeBaseError::NoSymptoms(name.to_string()));
            }
            for (symptom, &weight) in &condition.symptoms {
                if !(weight.is_finite() && weight > 0.0 && weight <= 1.0) {
                    return Err(KnowledgeBaseError::InvalidWeight {
                        condition: name.to_string(),
                        symptom: symptom.to_string(),
                        weight,
                    });
                }
            }
        }
        Ok(Self { conditions })
    }

    /// Read-only snapshot of every condition.
    pub fn all_conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

/// Catalog and knowledge base loaded from the same document.
#[derive(Debug, Clone)]
pub struct LoadedKnowledge {
    pub catalog: SymptomCatalog,
    pub knowledge_base: KnowledgeBase,
}

/// Parse and validate a knowledge base document.
pub fn load_from_str(json: &str) -> Result<LoadedKnowledge, KnowledgeBaseError> {
    let file: KnowledgeBaseFile = serde_json::from_str(json)?;
    let catalog = SymptomCatalog::new(&file.symptoms)?.with_synonyms(&file.synonyms)?;

    let mut conditions = Vec::with_capacity(file.conditions.len());
    for record in file.conditions {
        let name = record.name.trim().to_string();
        let mut symptoms = BTreeMap::new();
        for (raw, weight) in record.symptoms {
            let symptom =
                catalog
                    .normalize(&raw)
                    .map_err(|_| KnowledgeBaseError::UnknownSymptom {
                        condition: name.clone(),
                        symptom: raw.clone(),
                    })?;
            if symptoms.insert(symptom, weight).is_some() {
                return Err(KnowledgeBaseError::DuplicateSymptom {
                    condition: name,
                    symptom: raw,
                });
            }
        }

        let mut condition = Condition::new(name, record.description.trim(), symptoms)
            .with_precautions(record.precautions);
        condition.severity = record.severity;
        conditions.push(condition);
    }

    let knowledge_base = KnowledgeBase::new(conditions)?;
    tracing::info!(
        symptoms = catalog.len(),
        conditions = knowledge_base.len(),
        "Knowledge base loaded"
    );

    Ok(LoadedKnowledge {
        catalog,
        knowledge_base,
    })
}

/// Read and validate a knowledge base file.
pub fn load_from_path(path: &Path) -> Result<LoadedKnowledge, KnowledgeBaseError> {
    let json = std::fs::read_to_string(path).map_err(|source| KnowledgeBaseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_from_str(&json)
}
