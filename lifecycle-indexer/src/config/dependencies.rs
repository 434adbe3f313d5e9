use std::sync::Arc;

use lifecycle_indexer_pipeline::orchestrator::{LifecycleOrchestrator, LifecyclePlan};
use lifecycle_indexer_pipeline::processor::EventProcessor;
use lifecycle_indexer_pipeline::query::{ContractConfig, QueryBuilder};
use lifecycle_indexer_repository::{HttpIndexerGateway, RetryPolicy, RetryingGateway};
use lifecycle_indexer_shared::types::TaskEvent;
use tracing::info;

use crate::config::Settings;
use crate::config::handlers::{
    TASK_ASSIGNED, TASK_RESPONDED, TaskAssignedHandler, TaskRespondedHandler, worker_task_plan,
};
use crate::errors::IndexingError;

/// `Dependencies` holds the orchestrator wired to the hosted indexing
/// service and the plan it runs for the configured worker.
pub struct Dependencies {
    pub orchestrator: LifecycleOrchestrator<TaskEvent>,
    pub plan: LifecyclePlan,
}

impl Dependencies {
    /// Builds the HTTP gateway with its retry wrapper, registers the task
    /// handlers and prepares the worker's plan.
    ///
    /// No request is made here; an unusable contract address surfaces when
    /// the plan first runs.
    pub fn new(settings: &Settings) -> Result<Self, IndexingError> {
        let gateway = HttpIndexerGateway::new(settings.gateway.clone())?;
        let gateway = RetryingGateway::new(
            gateway,
            RetryPolicy::with_max_retries(settings.max_retries),
        );

        let mut processor = EventProcessor::new();
        processor.register_handler(TASK_ASSIGNED, Arc::new(TaskAssignedHandler))?;
        processor.register_handler(TASK_RESPONDED, Arc::new(TaskRespondedHandler))?;

        let query_builder = QueryBuilder::new(ContractConfig::new(
            settings.chain_id,
            settings.contract_address.clone(),
        ));

        info!(
            base_url = %settings.gateway.base_url,
            chain_id = settings.chain_id,
            contract = %settings.contract_address,
            worker = %settings.worker_address,
            "Dependencies initialized"
        );

        Ok(Dependencies {
            orchestrator: LifecycleOrchestrator::new(
                Arc::new(gateway),
                query_builder,
                Arc::new(processor),
            ),
            plan: worker_task_plan(settings.worker_address, settings.display_limit),
        })
    }
}
