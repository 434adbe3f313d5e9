//! Configuration types for the indexer gateway.

use std::time::Duration;

/// Default base URL of the hosted indexing service.
pub const DEFAULT_BASE_URL: &str = "https://api.indexsupply.net";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for [`crate::HttpIndexerGateway`].
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL of the service; the query endpoint is `{base_url}/v2/query`.
    pub base_url: String,
    /// API key sent as the `api-key` query parameter.
    pub api_key: Option<String>,
    /// Transport timeout for a single round trip.
    pub timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl GatewayConfig {
    /// Create a config for the given base URL with default timeout and no key.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full URL of the query endpoint.
    pub fn query_url(&self) -> String {
        format!("{}/v2/query", self.base_url.trim_end_matches('/'))
    }
}

/// Backoff settings for [`crate::RetryingGateway`].
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries after the first attempt. Zero disables retrying.
    pub max_retries: usize,
    /// First backoff delay; doubled on every further attempt.
    pub base_delay: Duration,
    /// Upper bound for a single backoff delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    pub fn with_max_retries(max_retries: usize) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_url_trims_trailing_slash() {
        assert_eq!(
            GatewayConfig::new("https://indexer.example/").query_url(),
            "https://indexer.example/v2/query"
        );
        assert_eq!(
            GatewayConfig::default().query_url(),
            "https://api.indexsupply.net/v2/query"
        );
    }

    #[test]
    fn test_builder_helpers() {
        let config = GatewayConfig::new("http://localhost:8080")
            .with_api_key("secret")
            .with_timeout(Duration::from_secs(5));
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }
}
