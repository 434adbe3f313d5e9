//! Error types for the lifecycle indexer repository.

mod transport_error;

pub use transport_error::TransportError;
