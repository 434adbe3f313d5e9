//! Error types for event signature parsing.
use thiserror::Error;

/// A human-authored event signature could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("Signature is empty")]
    Empty,
    #[error("Missing '(' in signature: {0}")]
    MissingOpenParen(String),
    #[error("Signature must end with ')': {0}")]
    MissingCloseParen(String),
    #[error("Invalid event name: {0}")]
    InvalidName(String),
    #[error("Parameter {index} is empty")]
    EmptyParameter { index: usize },
    #[error("Invalid parameter declaration: {0}")]
    InvalidParameter(String),
    #[error("Invalid parameter type: {0}")]
    InvalidType(String),
}
