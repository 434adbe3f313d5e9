use std::fmt::Debug;

use serde::Serialize;

use crate::types::DecodedEvent;

/// An event type that takes part in a multi-step workflow.
///
/// Events that describe the same workflow instance share a correlation key;
/// keys are compared by exact equality only.
pub trait LifecycleEvent: Clone + Debug + Send + Sync + 'static {
    type Key: Clone + Ord + Debug + Send + Sync;

    fn correlation_key(&self) -> Self::Key;
}

/// Status derived from which sides of a lifecycle have been observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LifecycleStatus {
    /// The initiating event was seen, the concluding one was not (yet).
    Pending,
    /// Both sides were seen. Terminal.
    Concluded,
}

/// The aggregated view of one workflow instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(bound(serialize = "E: Serialize, E::Key: Serialize"))]
pub struct Lifecycle<E: LifecycleEvent> {
    pub correlation_key: E::Key,
    pub initiating_event: DecodedEvent<E>,
    pub concluding_event: Option<DecodedEvent<E>>,
    pub status: LifecycleStatus,
}

impl<E: LifecycleEvent> Lifecycle<E> {
    /// Opens a lifecycle from its initiating event.
    pub fn pending(initiating_event: DecodedEvent<E>) -> Self {
        Self {
            correlation_key: initiating_event.event.correlation_key(),
            initiating_event,
            concluding_event: None,
            status: LifecycleStatus::Pending,
        }
    }

    /// Builds an already concluded lifecycle for a concluding event whose
    /// initiation was never recorded. The concluding event stands in for the
    /// initiating one.
    pub fn from_conclusion(concluding_event: DecodedEvent<E>) -> Self {
        Self {
            correlation_key: concluding_event.event.correlation_key(),
            initiating_event: concluding_event.clone(),
            concluding_event: Some(concluding_event),
            status: LifecycleStatus::Concluded,
        }
    }

    /// Attaches a conclusion. Returns `false` and leaves the lifecycle
    /// untouched when it is already concluded.
    pub fn conclude(&mut self, concluding_event: DecodedEvent<E>) -> bool {
        if self.status == LifecycleStatus::Concluded {
            return false;
        }
        self.concluding_event = Some(concluding_event);
        self.status = LifecycleStatus::Concluded;
        true
    }

    /// Replaces the initiating event, keeping any attached conclusion.
    pub fn replace_initiating(&mut self, initiating_event: DecodedEvent<E>) {
        self.initiating_event = initiating_event;
    }

    pub fn is_pending(&self) -> bool {
        self.status == LifecycleStatus::Pending
    }
}

/// Counts of lifecycles by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LifecycleSummary {
    pub total: usize,
    pub pending: usize,
    pub concluded: usize,
}

impl LifecycleSummary {
    pub fn of<E: LifecycleEvent>(lifecycles: &[Lifecycle<E>]) -> Self {
        let pending = lifecycles.iter().filter(|l| l.is_pending()).count();
        Self {
            total: lifecycles.len(),
            pending,
            concluded: lifecycles.len() - pending,
        }
    }
}
