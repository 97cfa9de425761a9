//! Error types for the JSON object model

use thiserror::Error;

/// Result type for schema and object operations
pub type Result<T> = std::result::Result<T, JsonError>;

/// JSON object model errors
#[derive(Error, Debug)]
pub enum JsonError {
    #[error("validation failed for '{field}': {reason}")]
    Validation { field: String, reason: String },

    #[error("property '{name}' is constant and cannot be assigned")]
    ImmutableProperty { name: String },

    #[error("schema conflict on '{name}': {reason}")]
    SchemaConflict { name: String, reason: String },

    #[error("malformed JSON text: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("property '{name}' is a {actual} property, not {expected}")]
    KindMismatch {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("invalid property declaration '{name}': {reason}")]
    InvalidProperty { name: String, reason: String },

    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl JsonError {
    /// Shorthand for a validation failure on a named field.
    pub(crate) fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        JsonError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
