use async_trait::async_trait;
use lifecycle_indexer_shared::types::{FilterQuery, RawEventRow};

use crate::errors::TransportError;

/// Abstracts the hosted log-indexing service.
///
/// Implementations are injected into the lifecycle orchestrator so that the
/// pipeline can be exercised against [`crate::MockIndexerGateway`] in tests.
#[async_trait]
pub trait IndexerGateway: Send + Sync {
    /// Submits one query and returns the reply flattened into rows.
    ///
    /// Rows keep the order the service returned them in, within and across
    /// result tables. An empty vector means the filter matched nothing.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] when no well-formed reply was obtained.
    async fn execute(&self, query: &FilterQuery) -> Result<Vec<RawEventRow>, TransportError>;
}
