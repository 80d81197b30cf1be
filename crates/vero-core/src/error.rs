use thiserror::Error;

use crate::ledger::EntryKind;

#[derive(Debug, Error)]
pub enum VeroError {
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Category {category} cannot be used for {kind:?} entries")]
    CategoryKindMismatch { category: String, kind: EntryKind },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("No statutory rates configured for fiscal year {0}")]
    UnsupportedFiscalYear(i32),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for VeroError {
    fn from(e: serde_json::Error) -> Self {
        VeroError::SerializationError(e.to_string())
    }
}
