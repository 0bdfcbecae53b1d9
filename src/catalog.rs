//! Symptom Catalog: the authoritative list of recognized symptoms.
//!
//! Turns free-text tokens into catalog identifiers (case folding, trimming,
//! whitespace collapsing, synonym lookup) and serves search-as-you-type
//! suggestions in catalog order.

use std::collections::HashMap;

use thiserror::Error;

use crate::models::Symptom;

/// Construction-time catalog problems.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("catalog entry is blank")]
    BlankEntry,

    #[error("duplicate catalog entry: {0}")]
    DuplicateEntry(String),

    #[error("synonym {alias:?} points at unknown symptom {target:?}")]
    DanglingSynonym { alias: String, target: String },

    #[error("synonym {0:?} shadows a catalog entry or another synonym")]
    ConflictingSynonym(String),
}

/// Outcome of a failed `normalize`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    /// No input given.
    #[error("no symptom given")]
    Blank,

    /// Input given, but no such symptom.
    #[error("no such symptom: {0:?}")]
    NotFound(String),
}

/// Lower-case, trim, and collapse inner whitespace runs to one space.
pub fn normalize_token(raw: &str) -> String {
    raw.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone)]
struct CatalogEntry {
    id: Symptom,
    label: String,
}

#[derive(Debug, Clone, Default)]
pub struct SymptomCatalog {
    entries: Vec<CatalogEntry>,
    /// normalized id → entry position
    index: HashMap<String, usize>,
    /// normalized alias → entry position
    synonyms: HashMap<String, usize>,
}

impl SymptomCatalog {
    /// Build a catalog from display labels, keeping their order.
    pub fn new<I, S>(labels: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut catalog = Self::default();
        for label in labels {
            let label = label.as_ref().trim();
            let id = normalize_token(label);
            if id.is_empty() {
                return Err(CatalogError::BlankEntry);
            }
            if catalog.index.contains_key(&id) {
                return Err(CatalogError::DuplicateEntry(label.to_string()));
            }
            catalog.index.insert(id.clone(), catalog.entries.len());
            catalog.entries.push(CatalogEntry {
                id: Symptom::from_normalized(id),
                label: label.to_string(),
            });
        }
        Ok(catalog)
    }

    /// Attach a fixed alias → symptom lookup table.
    pub fn with_synonyms<I, A, T>(mut self, synonyms: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = (A, T)>,
        A: AsRef<str>,
        T: AsRef<str>,
    {
        for (alias, target) in synonyms {
            let alias_key = normalize_token(alias.as_ref());
            if alias_key.is_empty()
                || self.index.contains_key(&alias_key)
                || self.synonyms.contains_key(&alias_key)
            {
                return Err(CatalogError::ConflictingSynonym(alias.as_ref().to_string()));
            }
            let position = self
                .index
                .get(&normalize_token(target.as_ref()))
                .copied()
                .ok_or_else(|| CatalogError::DanglingSynonym {
                    alias: alias.as_ref().to_string(),
                    target: target.as_ref().to_string(),
                })?;
            self.synonyms.insert(alias_key, position);
        }
        Ok(self)
    }

    /// Resolve a raw token to its catalog identifier.
    pub fn normalize(&self, raw: &str) -> Result<Symptom, NormalizeError> {
        let key = normalize_token(raw);
        if key.is_empty() {
            return Err(NormalizeError::Blank);
        }
        self.index
            .get(&key)
            .or_else(|| self.synonyms.get(&key))
            .map(|&position| self.entries[position].id.clone())
            .ok_or_else(|| NormalizeError::NotFound(raw.trim().to_string()))
    }

    /// Entries whose identifier contains `needle`, in catalog order.
    ///
    /// A blank needle yields nothing rather than the whole catalog.
    pub fn suggest(&self, needle: &str, limit: usize) -> Vec<Symptom> {
        let needle = normalize_token(needle);
        if needle.is_empty() {
            return Vec::new();
        }
        self.entries
            .iter()
            .filter(|entry| entry.id.as_str().contains(&needle))
            .take(limit)
            .map(|entry| entry.id.clone())
            .collect()
    }

    /// Display label the catalog was built with (e.g. "Shortness of Breath").
    pub fn label(&self, symptom: &Symptom) -> Option<&str> {
        self.index
            .get(symptom.as_str())
            .map(|&position| self.entries[position].label.as_str())
    }

    pub fn contains(&self, symptom: &Symptom) -> bool {
        self.index.contains_key(symptom.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
