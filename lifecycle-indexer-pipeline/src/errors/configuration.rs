//! Error types for query construction.
//! Every variant is raised before any network call and is never retried.
use thiserror::Error;

use crate::errors::FormatError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("Contract address is missing; refusing to query the whole chain")]
    MissingContractAddress,
    #[error("Invalid contract address: {0}")]
    InvalidContractAddress(String),
    #[error("Malformed event signature: {0}")]
    Signature(#[from] FormatError),
    #[error("Limit {provided} is outside 1..={max}")]
    LimitOutOfRange { provided: u32, max: u32 },
    #[error("Topic position 0 is reserved for the signature hash")]
    ReservedTopicPosition,
    #[error("Topic position {position} exceeds the {indexed} indexed parameters of the event")]
    TopicPositionOutOfRange { position: u8, indexed: usize },
    #[error("No handler registered for signature: {0}")]
    UnregisteredSignature(String),
}
