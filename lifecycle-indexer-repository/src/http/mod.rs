//! HTTP implementation of the indexer gateway.

mod gateway;
mod response;

pub use gateway::HttpIndexerGateway;
pub use response::{flatten_tables, ColumnDescriptor, QueryResponse, ResultTable};
