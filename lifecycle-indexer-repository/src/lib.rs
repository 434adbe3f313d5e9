//! # Lifecycle Indexer Repository
//!
//! The only I/O boundary of the lifecycle indexer. It submits filter queries
//! to the hosted log-indexing service and returns the reply as flat rows.
//!
//! This crate provides:
//! - [`IndexerGateway`] trait abstracting the service
//! - [`HttpIndexerGateway`] production client over HTTP
//! - [`MockIndexerGateway`] in-memory double honouring the query's filters
//! - [`RetryingGateway`] opt-in, caller-side retry wrapper
//!
//! A gateway performs exactly one round trip per query and never retries on
//! its own; an empty reply is a valid result, distinct from a
//! [`TransportError`].

pub mod config;
pub mod errors;
pub mod http;
pub mod interfaces;
mod mock;
mod retry;

pub use config::{GatewayConfig, RetryPolicy};
pub use errors::TransportError;
pub use http::{flatten_tables, HttpIndexerGateway, QueryResponse, ResultTable};
pub use interfaces::IndexerGateway;
pub use mock::MockIndexerGateway;
pub use retry::RetryingGateway;
