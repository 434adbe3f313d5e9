//! Interface definitions for the indexing service.

mod indexer_gateway;

pub use indexer_gateway::IndexerGateway;
