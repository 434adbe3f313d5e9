//! Transport error types.
//!
//! Any failure to obtain a well-formed reply from the indexing service.
//! The original response body is attached whenever one was received.

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// The HTTP client could not be constructed.
    #[error("Client error: {0}")]
    Client(String),

    /// The request did not complete (connection failure, timeout, ...).
    #[error("Request error: {0}")]
    Request(String),

    /// The service answered with a non-success status.
    #[error("Indexer responded with status {status}: {body}")]
    Status { status: u16, body: String },

    /// The service answered, but the body is not a result table.
    #[error("Failed to parse indexer response: {reason}")]
    Parse { reason: String, body: String },
}

impl TransportError {
    pub fn client(msg: impl Into<String>) -> Self {
        Self::Client(msg.into())
    }

    pub fn request(msg: impl Into<String>) -> Self {
        Self::Request(msg.into())
    }

    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    pub fn parse(reason: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Parse {
            reason: reason.into(),
            body: body.into(),
        }
    }

    /// Whether repeating the same request could succeed: request failures,
    /// rate limiting and server-side errors.
    pub fn is_retryable(&self) -> bool {
        match self {
            TransportError::Request(_) => true,
            TransportError::Status { status, .. } => *status == 429 || *status >= 500,
            TransportError::Client(_) | TransportError::Parse { .. } => false,
        }
    }

    /// The response body received from the service, if any.
    pub fn response_body(&self) -> Option<&str> {
        match self {
            TransportError::Status { body, .. } | TransportError::Parse { body, .. } => {
                Some(body.as_str())
            }
            _ => None,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self::Request(err.to_string())
    }
}
