//! This module defines the `LifecycleOrchestrator`, which runs one
//! aggregation pass: a discovery query, the dependent queries it bounds, and
//! the join of their results into lifecycles.
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use alloy::primitives::BlockNumber;
use lifecycle_indexer_repository::IndexerGateway;
use lifecycle_indexer_shared::types::{
    DecodedEvent, EventSignatureHash, FilterQuery, Lifecycle, LifecycleEvent, LifecycleSummary,
};
use serde::Serialize;
use tracing::{error, info, instrument, warn};

use crate::aggregator::aggregate_lifecycles;
use crate::errors::{ConfigurationError, DependentQueryError, OrchestratorError};
use crate::processor::EventProcessor;
use crate::query::{QueryBuilder, QueryOptions, TopicValue, DEFAULT_QUERY_LIMIT};

/// Number of lifecycles returned when a plan does not say otherwise.
pub const DEFAULT_DISPLAY_LIMIT: usize = 20;

/// One event query of a plan: a signature, topic constraints by position,
/// and a row limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventQuery {
    pub signature: String,
    pub topics: BTreeMap<u8, TopicValue>,
    pub limit: u32,
}

impl EventQuery {
    pub fn new(signature: impl Into<String>) -> Self {
        Self {
            signature: signature.into(),
            topics: BTreeMap::new(),
            limit: DEFAULT_QUERY_LIMIT,
        }
    }

    pub fn with_topic(mut self, position: u8, value: impl Into<TopicValue>) -> Self {
        self.topics.insert(position, value.into());
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }
}

/// A discovery query and the two dependent queries whose results are joined
/// into lifecycles.
///
/// The discovery query always runs oldest-first with a limit of one; only
/// the block of its first row is used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecyclePlan {
    pub discovery: EventQuery,
    pub initiating: EventQuery,
    pub concluding: EventQuery,
    pub display_limit: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum QueryStage {
    Initiating,
    Concluding,
}

impl fmt::Display for QueryStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryStage::Initiating => f.write_str("initiating"),
            QueryStage::Concluding => f.write_str("concluding"),
        }
    }
}

/// A dependent query that failed while the rest of the pass went on.
#[derive(Debug)]
pub struct QueryFailure {
    pub stage: QueryStage,
    pub error: DependentQueryError,
}

/// Outcome of one aggregation pass.
#[derive(Debug)]
pub struct LifecycleReport<E: LifecycleEvent> {
    /// Block of the discovery event, when one was found.
    pub discovery_block: Option<BlockNumber>,
    pub lifecycles: Vec<Lifecycle<E>>,
    /// Empty when every dependent query succeeded.
    pub failures: Vec<QueryFailure>,
}

impl<E: LifecycleEvent> LifecycleReport<E> {
    pub fn summary(&self) -> LifecycleSummary {
        LifecycleSummary::of(&self.lifecycles)
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// A dependent query ready to run, with the hash its rows are decoded by.
struct PreparedQuery {
    stage: QueryStage,
    query: FilterQuery,
    signature_hash: EventSignatureHash,
}

pub struct LifecycleOrchestrator<E> {
    gateway: Arc<dyn IndexerGateway>,
    query_builder: QueryBuilder,
    processor: Arc<EventProcessor<E>>,
}

impl<E: LifecycleEvent> LifecycleOrchestrator<E> {
    pub fn new(
        gateway: Arc<dyn IndexerGateway>,
        query_builder: QueryBuilder,
        processor: Arc<EventProcessor<E>>,
    ) -> Self {
        Self {
            gateway,
            query_builder,
            processor,
        }
    }

    /// Runs one aggregation pass.
    ///
    /// Every query is built and checked against the registered handlers
    /// before the first network call. A failed discovery query aborts the
    /// pass; a failed dependent query is recorded in the report and the
    /// lifecycles are built from whatever the other query returned.
    #[instrument(
        skip_all,
        fields(
            chain_id = self.query_builder.contract().chain_id,
            discovery = %plan.discovery.signature
        )
    )]
    pub async fn run(&self, plan: &LifecyclePlan) -> Result<LifecycleReport<E>, OrchestratorError> {
        let discovery = self.query_builder.build(
            &plan.discovery.signature,
            &plan.discovery.topics,
            &QueryOptions::default().with_limit(1).ascending(),
        )?;
        let initiating = self.prepare(QueryStage::Initiating, &plan.initiating)?;
        let concluding = self.prepare(QueryStage::Concluding, &plan.concluding)?;

        let discovery_block = self.discover(&discovery).await?;
        let (initiating, concluding) = match discovery_block {
            Some(block) => {
                info!(block, "Scoping dependent queries to discovery block");
                (initiating.starting_at(block), concluding.starting_at(block))
            }
            None => {
                info!("No discovery event found; dependent queries are unbounded");
                (initiating, concluding)
            }
        };

        let (initiating_result, concluding_result) =
            tokio::join!(self.execute(&initiating), self.execute(&concluding));

        let mut failures = Vec::new();
        let initiating_events = collect(&initiating, initiating_result, &mut failures);
        let concluding_events = collect(&concluding, concluding_result, &mut failures);

        let lifecycles =
            aggregate_lifecycles(initiating_events, concluding_events, plan.display_limit);
        let report = LifecycleReport {
            discovery_block,
            lifecycles,
            failures,
        };

        let summary = report.summary();
        info!(
            total = summary.total,
            pending = summary.pending,
            concluded = summary.concluded,
            failed_queries = report.failures.len(),
            "Aggregation pass finished"
        );
        Ok(report)
    }

    fn prepare(
        &self,
        stage: QueryStage,
        event_query: &EventQuery,
    ) -> Result<PreparedQuery, ConfigurationError> {
        let query = self.query_builder.build(
            &event_query.signature,
            &event_query.topics,
            &QueryOptions::default().with_limit(event_query.limit),
        )?;
        let signature_hash = query
            .signature_hash()
            .filter(|hash| self.processor.has_handler(hash))
            .ok_or_else(|| ConfigurationError::UnregisteredSignature(event_query.signature.clone()))?;

        Ok(PreparedQuery {
            stage,
            query,
            signature_hash,
        })
    }

    async fn discover(&self, query: &FilterQuery) -> Result<Option<BlockNumber>, OrchestratorError> {
        let rows = self
            .gateway
            .execute(query)
            .await
            .map_err(OrchestratorError::Discovery)?;

        let Some(first) = rows.first() else {
            return Ok(None);
        };
        match first.block_num() {
            Some(block) => Ok(Some(block)),
            None => {
                warn!("Discovery row has no readable block number; ignoring it");
                Ok(None)
            }
        }
    }

    async fn execute(
        &self,
        prepared: &PreparedQuery,
    ) -> Result<Vec<DecodedEvent<E>>, DependentQueryError> {
        let rows = self.gateway.execute(&prepared.query).await?;
        Ok(self.processor.process(&prepared.signature_hash, &rows)?)
    }
}

impl PreparedQuery {
    fn starting_at(self, block: BlockNumber) -> Self {
        Self {
            query: self.query.with_starting_block(block),
            ..self
        }
    }
}

fn collect<T>(
    prepared: &PreparedQuery,
    result: Result<Vec<T>, DependentQueryError>,
    failures: &mut Vec<QueryFailure>,
) -> Vec<T> {
    match result {
        Ok(events) => events,
        Err(e) => {
            error!(stage = %prepared.stage, error = %e, "Dependent query failed");
            failures.push(QueryFailure {
                stage: prepared.stage,
                error: e,
            });
            Vec::new()
        }
    }
}
