use dotenv::dotenv;
use lifecycle_indexer::telemetry::init_tracing;
use lifecycle_indexer::{Dependencies, IndexingError, Settings};
use tracing::{error, info, warn};

/// Main entry point for the Lifecycle Indexer application.
///
/// Loads settings, initialises tracing, runs one aggregation pass for the
/// configured worker and logs the resulting lifecycles.
#[tokio::main]
async fn main() -> Result<(), IndexingError> {
    dotenv().ok();

    let settings = Settings::from_env()?;
    init_tracing(&settings.tracing)?;

    let dependencies = Dependencies::new(&settings)?;

    let report = match dependencies.orchestrator.run(&dependencies.plan).await {
        Ok(report) => report,
        Err(e) => {
            error!(error = %e, "Aggregation pass failed");
            return Err(e.into());
        }
    };

    for lifecycle in &report.lifecycles {
        let initiated = &lifecycle.initiating_event;
        info!(
            task_id = %lifecycle.correlation_key,
            status = ?lifecycle.status,
            assigned_block = initiated.block_number,
            assigned_at = ?initiated.block_timestamp,
            responded_block = ?lifecycle.concluding_event.as_ref().map(|e| e.block_number),
            "Task lifecycle"
        );
    }

    for failure in &report.failures {
        warn!(stage = %failure.stage, error = %failure.error, "Results are incomplete");
    }

    let summary = report.summary();
    info!(
        worker = %settings.worker_address,
        discovery_block = ?report.discovery_block,
        total = summary.total,
        pending = summary.pending,
        concluded = summary.concluded,
        complete = report.is_complete(),
        "Lifecycle indexer finished"
    );
    Ok(())
}
