//! API endpoint handlers.

pub mod health;
pub mod rank;
pub mod symptoms;
