//! Handlers and query plan for the verification-task contract.
mod task;

pub use task::{
    TASK_ASSIGNED, TASK_RESPONDED, TaskAssignedHandler, TaskRespondedHandler, WORKER_REGISTERED,
    worker_task_plan,
};
