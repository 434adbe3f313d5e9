//! Error types for the Lifecycle Indexer application.
//! Consolidates errors from configuration, the gateway and the orchestrator.
use lifecycle_indexer_pipeline::errors::{FormatError, OrchestratorError};
use lifecycle_indexer_repository::TransportError;

#[derive(Debug, thiserror::Error)]
pub enum IndexingError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Invalid event signature: {0}")]
    Signature(#[from] FormatError),
    #[error("Orchestrator error: {0}")]
    Orchestrator(#[from] OrchestratorError),
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("Tracing initialisation failed: {0}")]
    Tracing(String),
}

impl IndexingError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
