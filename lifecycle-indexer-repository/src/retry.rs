//! Caller-side retry for any gateway.
//!
//! Gateways make one round trip per query. Callers that want to ride out
//! rate limiting or transient outages wrap their gateway in a
//! [`RetryingGateway`]; only errors classified by
//! [`TransportError::is_retryable`] are repeated.

use async_trait::async_trait;
use lifecycle_indexer_shared::types::{FilterQuery, RawEventRow};
use tokio_retry::strategy::{jitter, ExponentialBackoff};
use tokio_retry::RetryIf;
use tracing::warn;

use crate::config::RetryPolicy;
use crate::errors::TransportError;
use crate::interfaces::IndexerGateway;

pub struct RetryingGateway<G> {
    inner: G,
    policy: RetryPolicy,
}

impl<G: IndexerGateway> RetryingGateway<G> {
    pub fn new(inner: G, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn inner(&self) -> &G {
        &self.inner
    }

    /// Delays of `base, 2*base, 4*base, ...` capped at `max_delay`, jittered.
    fn strategy(&self) -> impl Iterator<Item = std::time::Duration> {
        let half_base_ms = (self.policy.base_delay.as_millis() as u64 / 2).max(1);
        ExponentialBackoff::from_millis(2)
            .factor(half_base_ms)
            .max_delay(self.policy.max_delay)
            .map(jitter)
            .take(self.policy.max_retries)
    }
}

#[async_trait]
impl<G: IndexerGateway> IndexerGateway for RetryingGateway<G> {
    async fn execute(&self, query: &FilterQuery) -> Result<Vec<RawEventRow>, TransportError> {
        let inner = &self.inner;
        RetryIf::spawn(
            self.strategy(),
            move || async move {
                let result = inner.execute(query).await;
                if let Err(e) = &result {
                    warn!(
                        error = %e,
                        retryable = e.is_retryable(),
                        "Indexer query attempt failed"
                    );
                }
                result
            },
            |err: &TransportError| err.is_retryable(),
        )
        .await
    }
}
