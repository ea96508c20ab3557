//! Error handling for the ordering core.
//!
//! Two families: [`OrderError`] covers recoverable per-utterance failures
//! that the formatting layer renders as user-facing text, and
//! [`StartupError`] covers fatal construction failures. A session must never
//! start against an empty or malformed catalog, so startup errors are not
//! recoverable. Empty-ledger conditions (confirm/cancel/remove on nothing)
//! are informational outcomes on the ledger types, not errors.

use thiserror::Error;

/// Recoverable errors raised while handling a single utterance.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum OrderError {
    #[error("no menu item matches '{phrase}'")]
    NotFound { phrase: String },

    #[error("'{phrase}' could mean one of {} items", suggestions.len())]
    Ambiguous {
        phrase: String,
        suggestions: Vec<String>,
    },

    #[error("quantity {quantity} exceeds the per-line limit of {limit}")]
    CapacityExceeded { quantity: u32, limit: u32 },

    #[error("'{item}' is in category '{category}', which cannot be ordered here")]
    PolicyViolation { item: String, category: String },

    #[error("{collaborator} call failed: {message}")]
    Collaborator {
        collaborator: &'static str,
        message: String,
    },
}

impl OrderError {
    /// Suggestions carried by an [`OrderError::Ambiguous`], empty otherwise.
    pub fn suggestions(&self) -> &[String] {
        match self {
            OrderError::Ambiguous { suggestions, .. } => suggestions,
            _ => &[],
        }
    }
}

/// Fatal errors while building the catalog or delivery areas.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("catalog source produced no items")]
    EmptyCatalog,

    #[error("catalog record '{name}': {reason}")]
    InvalidRecord { name: String, reason: String },

    #[error("duplicate catalog item '{name}'")]
    DuplicateItem { name: String },

    #[error("catalog record '{name}' has unknown category '{category}'")]
    UnknownCategory { name: String, category: String },

    #[error("delivery area source produced no localities")]
    EmptyDeliveryAreas,

    #[error("failed to read data source: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed data source: {0}")]
    Csv(#[from] csv::Error),
}
