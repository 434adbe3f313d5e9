//! Lifecycle Indexer Library
//!
//! Wires the lifecycle pipeline to the hosted log-indexing service from
//! environment configuration, and registers the verification-task events
//! whose lifecycles the binary reports.

pub mod config;
pub mod errors;
pub mod telemetry;

pub use config::{Dependencies, Settings};
pub use errors::IndexingError;
