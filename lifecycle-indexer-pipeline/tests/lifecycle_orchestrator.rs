use std::sync::Arc;

use alloy::hex;
use alloy::primitives::{address, Address, B256, U256};
use lifecycle_indexer_pipeline::codec::pad_address;
use lifecycle_indexer_pipeline::errors::{ConfigurationError, DecodeError, OrchestratorError};
use lifecycle_indexer_pipeline::orchestrator::{
    EventQuery, LifecycleOrchestrator, LifecyclePlan, QueryStage,
};
use lifecycle_indexer_pipeline::processor::{
    address_field, bool_field, bytes32_field, uint_field, EventProcessor, HandleEvent,
};
use lifecycle_indexer_pipeline::query::{ContractConfig, QueryBuilder};
use lifecycle_indexer_pipeline::signature::signature_hash;
use lifecycle_indexer_repository::MockIndexerGateway;
use lifecycle_indexer_shared::types::{
    DecodedFields, LifecycleStatus, RawEventRow, SortDirection, TaskAssigned, TaskEvent,
    TaskResponded,
};
use serde_json::json;

const CONTRACT: &str = "0x1111111111111111111111111111111111111111";
const WORKER_REGISTERED: &str = "WorkerRegistered(address indexed worker, uint256 stake)";
const TASK_ASSIGNED: &str = "TaskAssigned(bytes32 indexed taskId, address indexed worker, address requester, uint256 reward)";
const TASK_RESPONDED: &str =
    "TaskResponded(bytes32 indexed taskId, address indexed worker, bool approved)";

const WORKER: Address = address!("00000000000000000000000000000000000000ab");
const OTHER_WORKER: Address = address!("00000000000000000000000000000000000000cd");
const REQUESTER: Address = address!("2222222222222222222222222222222222222222");

struct AssignedHandler;

impl HandleEvent<TaskEvent> for AssignedHandler {
    fn handle(&self, fields: &DecodedFields) -> Result<TaskEvent, DecodeError> {
        Ok(TaskEvent::Assigned(TaskAssigned {
            task_id: bytes32_field(fields, "taskId")?,
            worker: address_field(fields, "worker")?,
            requester: address_field(fields, "requester")?,
            reward: uint_field(fields, "reward")?,
        }))
    }
}

struct RespondedHandler;

impl HandleEvent<TaskEvent> for RespondedHandler {
    fn handle(&self, fields: &DecodedFields) -> Result<TaskEvent, DecodeError> {
        Ok(TaskEvent::Responded(TaskResponded {
            task_id: bytes32_field(fields, "taskId")?,
            worker: address_field(fields, "worker")?,
            approved: bool_field(fields, "approved")?,
        }))
    }
}

fn word(value: B256) -> serde_json::Value {
    json!(hex::encode_prefixed(value))
}

fn data(words: &[B256]) -> serde_json::Value {
    let body: String = words.iter().map(hex::encode).collect();
    json!(format!("0x{body}"))
}

fn base_row(block: u64) -> RawEventRow {
    RawEventRow::new()
        .with("block_num", json!(block))
        .with("block_timestamp", json!("2025-12-16 2:01:12.0 +00:00:00"))
        .with("tx_hash", word(B256::with_last_byte((block % 256) as u8)))
}

fn registration(worker: Address, block: u64) -> RawEventRow {
    base_row(block)
        .with("topics[1]", word(pad_address(worker)))
        .with("data", data(&[B256::from(U256::from(10u64))]))
}

fn assignment(task: u8, worker: Address, block: u64) -> RawEventRow {
    base_row(block)
        .with("topics[1]", word(B256::repeat_byte(task)))
        .with("topics[2]", word(pad_address(worker)))
        .with(
            "data",
            data(&[REQUESTER.into_word(), B256::from(U256::from(500u64))]),
        )
}

fn response(task: u8, worker: Address, block: u64, approved: bool) -> RawEventRow {
    base_row(block)
        .with("topics[1]", word(B256::repeat_byte(task)))
        .with("topics[2]", word(pad_address(worker)))
        .with("data", data(&[B256::from(U256::from(u8::from(approved)))]))
}

fn plan() -> LifecyclePlan {
    LifecyclePlan {
        discovery: EventQuery::new(WORKER_REGISTERED).with_topic(1, WORKER),
        initiating: EventQuery::new(TASK_ASSIGNED).with_topic(2, WORKER),
        concluding: EventQuery::new(TASK_RESPONDED).with_topic(2, WORKER),
        display_limit: 20,
    }
}

fn processor() -> Arc<EventProcessor<TaskEvent>> {
    let mut processor = EventProcessor::new();
    processor
        .register_handler(TASK_ASSIGNED, Arc::new(AssignedHandler))
        .unwrap();
    processor
        .register_handler(TASK_RESPONDED, Arc::new(RespondedHandler))
        .unwrap();
    Arc::new(processor)
}

fn orchestrator(gateway: Arc<MockIndexerGateway>, contract: &str) -> LifecycleOrchestrator<TaskEvent> {
    LifecycleOrchestrator::new(
        gateway,
        QueryBuilder::new(ContractConfig::new(8453, contract)),
        processor(),
    )
}

fn seeded_gateway() -> Arc<MockIndexerGateway> {
    let gateway = Arc::new(MockIndexerGateway::new());
    gateway.register_rows(
        signature_hash(WORKER_REGISTERED).unwrap(),
        vec![
            registration(OTHER_WORKER, 900_000),
            registration(WORKER, 1_000_000),
            registration(WORKER, 1_000_500),
        ],
    );
    gateway.register_rows(
        signature_hash(TASK_ASSIGNED).unwrap(),
        vec![
            assignment(0, WORKER, 999_000),
            assignment(1, WORKER, 1_000_010),
            assignment(2, WORKER, 1_000_020),
            assignment(3, OTHER_WORKER, 1_000_030),
        ],
    );
    gateway.register_rows(
        signature_hash(TASK_RESPONDED).unwrap(),
        vec![response(2, WORKER, 1_000_025, true)],
    );
    gateway
}

#[tokio::test]
async fn test_discovery_bounds_dependent_queries() {
    let gateway = seeded_gateway();
    let report = orchestrator(gateway.clone(), CONTRACT)
        .run(&plan())
        .await
        .unwrap();

    assert_eq!(report.discovery_block, Some(1_000_000));
    assert!(report.is_complete());

    let executed = gateway.executed_queries();
    assert_eq!(executed.len(), 3);
    let discovery = &executed[0];
    assert_eq!(discovery.limit, 1);
    assert_eq!(discovery.order_by.direction, SortDirection::Ascending);
    assert_eq!(discovery.starting_block, None);
    for dependent in &executed[1..] {
        assert_eq!(dependent.starting_block, Some(1_000_000));
        assert_eq!(dependent.order_by.direction, SortDirection::Descending);
    }

    for lifecycle in &report.lifecycles {
        assert!(lifecycle.initiating_event.block_number >= 1_000_000);
    }
}

#[tokio::test]
async fn test_lifecycles_are_joined_by_task_id() {
    let report = orchestrator(seeded_gateway(), CONTRACT)
        .run(&plan())
        .await
        .unwrap();

    let lifecycles = &report.lifecycles;
    assert_eq!(lifecycles.len(), 2);

    assert_eq!(lifecycles[0].correlation_key, B256::repeat_byte(2));
    assert_eq!(lifecycles[0].status, LifecycleStatus::Concluded);
    let conclusion = lifecycles[0].concluding_event.as_ref().unwrap();
    assert_eq!(conclusion.block_number, 1_000_025);
    assert!(matches!(
        &conclusion.event,
        TaskEvent::Responded(TaskResponded { approved: true, .. })
    ));

    assert_eq!(lifecycles[1].correlation_key, B256::repeat_byte(1));
    assert_eq!(lifecycles[1].status, LifecycleStatus::Pending);
    match &lifecycles[1].initiating_event.event {
        TaskEvent::Assigned(assigned) => {
            assert_eq!(assigned.worker, WORKER);
            assert_eq!(assigned.requester, REQUESTER);
            assert_eq!(assigned.reward, U256::from(500u64));
        }
        other => panic!("unexpected initiating event: {other:?}"),
    }
    assert!(lifecycles[1].initiating_event.block_timestamp.is_some());

    let summary = report.summary();
    assert_eq!((summary.total, summary.pending, summary.concluded), (2, 1, 1));
}

#[tokio::test]
async fn test_repeated_passes_are_identical() {
    let orchestrator = orchestrator(seeded_gateway(), CONTRACT);
    let first = orchestrator.run(&plan()).await.unwrap();
    let second = orchestrator.run(&plan()).await.unwrap();

    assert_eq!(
        serde_json::to_string(&first.lifecycles).unwrap(),
        serde_json::to_string(&second.lifecycles).unwrap()
    );
}

#[tokio::test]
async fn test_failed_dependent_query_is_reported() {
    let gateway = seeded_gateway();
    gateway.fail_on(signature_hash(TASK_RESPONDED).unwrap());

    let report = orchestrator(gateway, CONTRACT).run(&plan()).await.unwrap();

    assert!(!report.is_complete());
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].stage, QueryStage::Concluding);
    assert_eq!(report.lifecycles.len(), 2);
    assert!(report
        .lifecycles
        .iter()
        .all(|lifecycle| lifecycle.status == LifecycleStatus::Pending));
}

#[tokio::test]
async fn test_failed_discovery_aborts_pass() {
    let gateway = seeded_gateway();
    gateway.fail_on(signature_hash(WORKER_REGISTERED).unwrap());

    let result = orchestrator(gateway.clone(), CONTRACT).run(&plan()).await;

    assert!(matches!(result, Err(OrchestratorError::Discovery(_))));
    assert_eq!(gateway.execution_count(), 1);
}

#[tokio::test]
async fn test_missing_discovery_event_leaves_queries_unbounded() {
    let gateway = seeded_gateway();
    let mut plan = plan();
    plan.discovery = EventQuery::new(WORKER_REGISTERED)
        .with_topic(1, address!("00000000000000000000000000000000000000ef"));

    let report = orchestrator(gateway.clone(), CONTRACT).run(&plan).await.unwrap();

    assert_eq!(report.discovery_block, None);
    assert!(gateway.executed_queries()[1..]
        .iter()
        .all(|query| query.starting_block.is_none()));
    assert_eq!(report.lifecycles.len(), 3);
}

#[tokio::test]
async fn test_missing_contract_fails_before_any_request() {
    let gateway = seeded_gateway();
    let result = orchestrator(gateway.clone(), "").run(&plan()).await;

    assert!(matches!(
        result,
        Err(OrchestratorError::Configuration(
            ConfigurationError::MissingContractAddress
        ))
    ));
    assert_eq!(gateway.execution_count(), 0);
}

#[tokio::test]
async fn test_unregistered_signature_fails_before_any_request() {
    let gateway = seeded_gateway();
    let mut plan = plan();
    plan.concluding = EventQuery::new("TaskCancelled(bytes32 indexed taskId, address indexed worker)")
        .with_topic(2, WORKER);

    let result = orchestrator(gateway.clone(), CONTRACT).run(&plan).await;

    assert!(matches!(
        result,
        Err(OrchestratorError::Configuration(
            ConfigurationError::UnregisteredSignature(_)
        ))
    ));
    assert_eq!(gateway.execution_count(), 0);
}

#[tokio::test]
async fn test_display_limit_truncates_newest_first() {
    let mut plan = plan();
    plan.display_limit = 1;

    let report = orchestrator(seeded_gateway(), CONTRACT).run(&plan).await.unwrap();

    assert_eq!(report.lifecycles.len(), 1);
    assert_eq!(report.lifecycles[0].correlation_key, B256::repeat_byte(2));
}
