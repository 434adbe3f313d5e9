//! Tracing setup.
//!
//! The filter is passed in explicitly rather than read from global state at
//! initialisation time, so the noise of third-party HTTP crates is bounded by
//! configuration alone.
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::errors::IndexingError;

pub const DEFAULT_FILTER: &str = "lifecycle_indexer=info,lifecycle_indexer_pipeline=info,lifecycle_indexer_repository=info,hyper=warn,reqwest=warn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    /// `EnvFilter` directives.
    pub filter: String,
    /// JSON lines instead of pretty console output.
    pub json: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_string(),
            json: false,
        }
    }
}

/// Installs the global subscriber. Fails if the filter does not parse or a
/// subscriber is already installed.
pub fn init_tracing(config: &TracingConfig) -> Result<(), IndexingError> {
    let filter = EnvFilter::try_new(&config.filter)
        .map_err(|e| IndexingError::Tracing(format!("invalid filter {:?}: {e}", config.filter)))?;

    if config.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .try_init()
            .map_err(|e| IndexingError::Tracing(e.to_string()))?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .try_init()
            .map_err(|e| IndexingError::Tracing(e.to_string()))?;
    }

    info!(
        service_name = "lifecycle-indexer",
        service_version = env!("CARGO_PKG_VERSION"),
        json = config.json,
        "Tracing initialized"
    );
    Ok(())
}
