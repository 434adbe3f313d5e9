//! HTTP client for the hosted indexing service.

use async_trait::async_trait;
use lifecycle_indexer_shared::types::{FilterQuery, RawEventRow};
use reqwest::Client as ReqwestClient;
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::config::GatewayConfig;
use crate::errors::TransportError;
use crate::http::response::QueryResponse;
use crate::interfaces::IndexerGateway;

/// Request body entry: one query text plus the event declarations it uses.
#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    query: String,
    signatures: &'a [String],
}

/// Production gateway posting queries to `{base_url}/v2/query`.
///
/// # Example
///
/// ```ignore
/// use lifecycle_indexer_repository::{GatewayConfig, HttpIndexerGateway, IndexerGateway};
///
/// let gateway = HttpIndexerGateway::new(GatewayConfig::default().with_api_key("key"))?;
/// let rows = gateway.execute(&query).await?;
/// ```
pub struct HttpIndexerGateway {
    client: ReqwestClient,
    config: GatewayConfig,
}

impl HttpIndexerGateway {
    /// Creates a gateway whose transport enforces `config.timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Client`] if the HTTP client cannot be built.
    pub fn new(config: GatewayConfig) -> Result<Self, TransportError> {
        let client = ReqwestClient::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| TransportError::client(e.to_string()))?;

        info!(
            url = %config.query_url(),
            timeout_secs = config.timeout.as_secs(),
            authenticated = config.api_key.is_some(),
            "Created indexer gateway"
        );

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

#[async_trait]
impl IndexerGateway for HttpIndexerGateway {
    #[instrument(skip_all, fields(chain_id = query.chain_id, limit = query.limit))]
    async fn execute(&self, query: &FilterQuery) -> Result<Vec<RawEventRow>, TransportError> {
        let sql = query.to_sql();
        debug!(sql = %sql, signatures = ?query.signatures, "Submitting filter query");

        let body = [QueryRequest {
            query: sql,
            signatures: &query.signatures,
        }];

        let mut request = self.client.post(self.config.query_url()).json(&body);
        if let Some(api_key) = &self.config.api_key {
            request = request.query(&[("api-key", api_key)]);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(TransportError::status(status.as_u16(), text));
        }

        let parsed: QueryResponse = serde_json::from_str(&text)
            .map_err(|e| TransportError::parse(e.to_string(), text.clone()))?;
        let rows = parsed.into_rows();

        debug!(rows = rows.len(), "Filter query returned");
        Ok(rows)
    }
}
