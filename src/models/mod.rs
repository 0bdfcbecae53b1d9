//! Domain types: symptoms, queries, conditions and ranked matches.

pub mod condition;
pub mod enums;
pub mod match_result;
pub mod symptom;

pub use condition::Condition;
pub use enums::{BackendKind, ConfidenceTier, DurationBucket, Gender, InvalidEnum, SeverityTier};
pub use match_result::MatchResult;
pub use symptom::{Symptom, SymptomContext, SymptomQuery};
