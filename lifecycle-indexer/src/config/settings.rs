use std::env;
use std::str::FromStr;
use std::time::Duration;

use alloy::primitives::Address;
use lifecycle_indexer_pipeline::orchestrator::DEFAULT_DISPLAY_LIMIT;
use lifecycle_indexer_repository::GatewayConfig;
use lifecycle_indexer_repository::config::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};

use crate::errors::IndexingError;
use crate::telemetry::{DEFAULT_FILTER, TracingConfig};

const DEFAULT_CHAIN_ID: u64 = 8453;
const DEFAULT_MAX_RETRIES: usize = 3;

/// Everything the binary reads from the environment.
#[derive(Debug, Clone)]
pub struct Settings {
    pub gateway: GatewayConfig,
    pub max_retries: usize,
    pub chain_id: u64,
    /// Kept as text; an empty value is rejected when queries are built.
    pub contract_address: String,
    pub worker_address: Address,
    pub display_limit: usize,
    pub tracing: TracingConfig,
}

impl Settings {
    /// Reads the settings from environment variables.
    ///
    /// `TASK_CONTRACT_ADDRESS` and `WORKER_ADDRESS` are required; everything
    /// else has a default.
    pub fn from_env() -> Result<Self, IndexingError> {
        let base_url = env::var("INDEXER_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let timeout_secs: u64 = parse_var("INDEXER_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;

        let mut gateway =
            GatewayConfig::new(base_url).with_timeout(Duration::from_secs(timeout_secs));
        if let Some(api_key) = env::var("INDEXER_API_KEY").ok().filter(|key| !key.is_empty()) {
            gateway = gateway.with_api_key(api_key);
        }

        let contract_address = env::var("TASK_CONTRACT_ADDRESS")
            .map_err(|_| IndexingError::config("TASK_CONTRACT_ADDRESS must be set"))?;
        let worker_address = env::var("WORKER_ADDRESS")
            .map_err(|_| IndexingError::config("WORKER_ADDRESS must be set"))?;
        let worker_address = Address::from_str(worker_address.trim()).map_err(|_| {
            IndexingError::config(format!("WORKER_ADDRESS is not an address: {worker_address}"))
        })?;

        let tracing = TracingConfig {
            filter: env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_FILTER.to_string()),
            json: env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json")),
        };

        Ok(Self {
            gateway,
            max_retries: parse_var("INDEXER_MAX_RETRIES", DEFAULT_MAX_RETRIES)?,
            chain_id: parse_var("CHAIN_ID", DEFAULT_CHAIN_ID)?,
            contract_address,
            worker_address,
            display_limit: parse_var("DISPLAY_LIMIT", DEFAULT_DISPLAY_LIMIT)?,
            tracing,
        })
    }
}

fn parse_var<T: FromStr>(key: &str, default: T) -> Result<T, IndexingError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| IndexingError::config(format!("{key} has an invalid value: {raw}"))),
        Err(_) => Ok(default),
    }
}
