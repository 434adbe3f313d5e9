//! Error types for log decoding.
//! A decode error discards the row it happened in, never the whole query.
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("Missing column: {0}")]
    MissingColumn(String),
    #[error("Invalid value in column {column}: {reason}")]
    InvalidColumn { column: String, reason: String },
    #[error("Invalid hex: {0}")]
    InvalidHex(String),
    #[error("Expected a 32-byte word, got {0} bytes")]
    InvalidWordLength(usize),
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),
    #[error("Data blob too short: expected {expected} bytes, got {actual}")]
    DataTooShort { expected: usize, actual: usize },
    #[error("Missing field: {0}")]
    MissingField(String),
    #[error("Field {field} is not of type {expected}")]
    FieldType { field: String, expected: String },
    #[error("No handler registered for signature hash {0}")]
    UnregisteredSignature(String),
}

impl DecodeError {
    pub fn invalid_column(column: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidColumn {
            column: column.into(),
            reason: reason.into(),
        }
    }

    pub fn field_type(field: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::FieldType {
            field: field.into(),
            expected: expected.into(),
        }
    }
}
