//! Error types for the lifecycle orchestrator.
use lifecycle_indexer_repository::TransportError;
use thiserror::Error;

use crate::errors::{ConfigurationError, DecodeError};

/// Errors that abort a whole aggregation pass.
///
/// Failures of dependent queries do not appear here; they are reported
/// alongside the lifecycles that could still be built.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("Discovery query failed: {0}")]
    Discovery(TransportError),
}

/// Why a dependent query contributed no events.
#[derive(Debug, Error)]
pub enum DependentQueryError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}
