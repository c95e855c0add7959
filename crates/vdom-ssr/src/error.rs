//! Error types
//!
//! Parse and missing-field errors never leave the normalizer; the rest are
//! returned to the caller.

use crate::decode::DecodeError;

/// Result type for virtual DOM operations
pub type VdomResult<T> = Result<T, VdomError>;

/// Virtual DOM operation errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum VdomError {
    /// Serialized input is not well-formed JSON
    #[error("Parse error: {0}")]
    Parse(String),

    /// A required field is absent (or null)
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// Node has no fact table, or a field has the wrong shape
    #[error("Invalid node: {0}")]
    InvalidNode(String),

    /// Named event is not registered on the node
    #[error("Event {0} not found")]
    EventNotFound(String),

    /// The event's decoder rejected the value
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Output could not be serialized
    #[error("Serialize error: {0}")]
    Serialize(String),
}

impl From<serde_json::Error> for VdomError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_syntax() || err.is_eof() {
            Self::Parse(err.to_string())
        } else {
            Self::Serialize(err.to_string())
        }
    }
}
