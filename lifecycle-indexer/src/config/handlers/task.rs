use alloy::primitives::Address;
use lifecycle_indexer_pipeline::errors::DecodeError;
use lifecycle_indexer_pipeline::orchestrator::{EventQuery, LifecyclePlan};
use lifecycle_indexer_pipeline::processor::{
    HandleEvent, address_field, bool_field, bytes32_field, uint_field,
};
use lifecycle_indexer_shared::types::{DecodedFields, TaskAssigned, TaskEvent, TaskResponded};

/// Emitted once when a worker joins; bounds every later query for that worker.
pub const WORKER_REGISTERED: &str = "WorkerRegistered(address indexed worker, uint256 stake)";
pub const TASK_ASSIGNED: &str = "TaskAssigned(bytes32 indexed taskId, address indexed worker, address requester, uint256 reward)";
pub const TASK_RESPONDED: &str =
    "TaskResponded(bytes32 indexed taskId, address indexed worker, bool approved)";

/// Topic position of `worker` in all three events.
const WORKER_REGISTERED_WORKER_TOPIC: u8 = 1;
const TASK_WORKER_TOPIC: u8 = 2;

pub struct TaskAssignedHandler;

impl HandleEvent<TaskEvent> for TaskAssignedHandler {
    /// Handles a task assignment.
    ///
    /// # Errors
    ///
    /// Returns a `DecodeError` if a field is missing or has an unexpected type.
    fn handle(&self, fields: &DecodedFields) -> Result<TaskEvent, DecodeError> {
        Ok(TaskEvent::Assigned(TaskAssigned {
            task_id: bytes32_field(fields, "taskId")?,
            worker: address_field(fields, "worker")?,
            requester: address_field(fields, "requester")?,
            reward: uint_field(fields, "reward")?,
        }))
    }
}

pub struct TaskRespondedHandler;

impl HandleEvent<TaskEvent> for TaskRespondedHandler {
    fn handle(&self, fields: &DecodedFields) -> Result<TaskEvent, DecodeError> {
        Ok(TaskEvent::Responded(TaskResponded {
            task_id: bytes32_field(fields, "taskId")?,
            worker: address_field(fields, "worker")?,
            approved: bool_field(fields, "approved")?,
        }))
    }
}

/// Lifecycles of the tasks assigned to `worker`, bounded by the worker's
/// registration block.
pub fn worker_task_plan(worker: Address, display_limit: usize) -> LifecyclePlan {
    LifecyclePlan {
        discovery: EventQuery::new(WORKER_REGISTERED)
            .with_topic(WORKER_REGISTERED_WORKER_TOPIC, worker),
        initiating: EventQuery::new(TASK_ASSIGNED).with_topic(TASK_WORKER_TOPIC, worker),
        concluding: EventQuery::new(TASK_RESPONDED).with_topic(TASK_WORKER_TOPIC, worker),
        display_limit,
    }
}
