use super::value_objects::RecordId;
use crate::store::StoreError;

// ============================================================================
// Ordering Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum OrderingError {
    #[error("Malformed reorder command: {0}")]
    MalformedCommand(String),

    #[error("Position {index} is outside the visible window of {len} records")]
    IndexOutOfRange { index: i64, len: usize },

    #[error("Missing sorting methods on model {model}")]
    UnsupportedModel { model: String },

    #[error("Record not found: {0}")]
    NotFound(RecordId),

    #[error("Storage failure: {0}")]
    Storage(#[from] StoreError),
}

impl OrderingError {
    /// Short label used for metrics and logs.
    pub fn reason(&self) -> &'static str {
        match self {
            OrderingError::MalformedCommand(_) => "malformed_command",
            OrderingError::IndexOutOfRange { .. } => "index_out_of_range",
            OrderingError::UnsupportedModel { .. } => "unsupported_model",
            OrderingError::NotFound(_) => "not_found",
            OrderingError::Storage(_) => "storage",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ScopeError {
    #[error("Invalid SQL identifier: '{0}'")]
    InvalidIdentifier(String),
}
