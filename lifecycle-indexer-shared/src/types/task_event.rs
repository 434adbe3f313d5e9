use alloy::primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

use crate::types::LifecycleEvent;

/// A verification task was handed to a worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskAssigned {
    pub task_id: B256,
    pub worker: Address,
    pub requester: Address,
    pub reward: U256,
}

/// A worker answered a verification task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskResponded {
    pub task_id: B256,
    pub worker: Address,
    pub approved: bool,
}

/// Events of the verification-task workflow, correlated by task id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskEvent {
    Assigned(TaskAssigned),
    Responded(TaskResponded),
}

impl TaskEvent {
    pub fn task_id(&self) -> B256 {
        match self {
            TaskEvent::Assigned(assigned) => assigned.task_id,
            TaskEvent::Responded(responded) => responded.task_id,
        }
    }

    pub fn worker(&self) -> Address {
        match self {
            TaskEvent::Assigned(assigned) => assigned.worker,
            TaskEvent::Responded(responded) => responded.worker,
        }
    }
}

impl LifecycleEvent for TaskEvent {
    type Key = B256;

    fn correlation_key(&self) -> B256 {
        self.task_id()
    }
}
