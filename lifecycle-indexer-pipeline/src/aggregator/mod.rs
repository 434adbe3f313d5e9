//! Joining of independently queried initiating and concluding event streams
//! into one lifecycle per correlation key.
//!
//! Aggregation is a pure function of its two input streams. Running it twice
//! over the same streams yields identical output, and the arrival order of
//! the streams relative to each other does not matter.
use std::collections::BTreeMap;

use lifecycle_indexer_shared::types::{DecodedEvent, Lifecycle, LifecycleEvent};
use tracing::debug;

pub struct LifecycleAggregator<E: LifecycleEvent> {
    lifecycles: BTreeMap<E::Key, Lifecycle<E>>,
}

impl<E: LifecycleEvent> Default for LifecycleAggregator<E> {
    fn default() -> Self {
        Self {
            lifecycles: BTreeMap::new(),
        }
    }
}

impl<E: LifecycleEvent> LifecycleAggregator<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an initiating event. A later initiating event with the same
    /// key replaces the earlier one but keeps any conclusion already attached.
    pub fn add_initiating(&mut self, event: DecodedEvent<E>) {
        let key = event.event.correlation_key();
        match self.lifecycles.get_mut(&key) {
            Some(lifecycle) => {
                debug!(key = ?key, "Replacing initiating event for duplicate key");
                lifecycle.replace_initiating(event);
            }
            None => {
                self.lifecycles.insert(key, Lifecycle::pending(event));
            }
        }
    }

    /// Records a concluding event.
    ///
    /// Attaches it to a pending lifecycle with the same key. With no such
    /// lifecycle, one is synthesized from the concluding event alone. A
    /// lifecycle that is already concluded is left untouched.
    pub fn add_concluding(&mut self, event: DecodedEvent<E>) {
        let key = event.event.correlation_key();
        match self.lifecycles.get_mut(&key) {
            Some(lifecycle) => {
                if !lifecycle.conclude(event) {
                    debug!(key = ?key, "Ignoring extra concluding event");
                }
            }
            None => {
                debug!(key = ?key, "Concluding event without initiation");
                self.lifecycles.insert(key, Lifecycle::from_conclusion(event));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.lifecycles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lifecycles.is_empty()
    }

    /// Newest initiation first, at most `display_limit` entries.
    ///
    /// Lifecycles initiated in the same block keep ascending key order.
    pub fn finish(self, display_limit: usize) -> Vec<Lifecycle<E>> {
        let mut lifecycles: Vec<Lifecycle<E>> = self.lifecycles.into_values().collect();
        lifecycles.sort_by(|a, b| {
            b.initiating_event
                .block_number
                .cmp(&a.initiating_event.block_number)
        });
        lifecycles.truncate(display_limit);
        lifecycles
    }
}

/// Inserts every initiating event, then every concluding event, and returns
/// the sorted and truncated lifecycles.
pub fn aggregate_lifecycles<E: LifecycleEvent>(
    initiating: impl IntoIterator<Item = DecodedEvent<E>>,
    concluding: impl IntoIterator<Item = DecodedEvent<E>>,
    display_limit: usize,
) -> Vec<Lifecycle<E>> {
    let mut aggregator = LifecycleAggregator::new();
    for event in initiating {
        aggregator.add_initiating(event);
    }
    for event in concluding {
        aggregator.add_concluding(event);
    }
    aggregator.finish(display_limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{address, B256, U256};
    use lifecycle_indexer_shared::types::{
        LifecycleStatus, LifecycleSummary, TaskAssigned, TaskEvent, TaskResponded,
    };

    fn key(byte: u8) -> B256 {
        B256::repeat_byte(byte)
    }

    fn decoded(event: TaskEvent, block_number: u64) -> DecodedEvent<TaskEvent> {
        DecodedEvent {
            event,
            block_number,
            block_timestamp: None,
            transaction_hash: B256::with_last_byte(block_number as u8),
        }
    }

    fn assigned(task: u8, block: u64) -> DecodedEvent<TaskEvent> {
        decoded(
            TaskEvent::Assigned(TaskAssigned {
                task_id: key(task),
                worker: address!("00000000000000000000000000000000000000ab"),
                requester: address!("00000000000000000000000000000000000000cd"),
                reward: U256::from(block),
            }),
            block,
        )
    }

    fn responded(task: u8, block: u64, approved: bool) -> DecodedEvent<TaskEvent> {
        decoded(
            TaskEvent::Responded(TaskResponded {
                task_id: key(task),
                worker: address!("00000000000000000000000000000000000000ab"),
                approved,
            }),
            block,
        )
    }

    #[test]
    fn test_pending_and_concluded_lifecycles() {
        let lifecycles = aggregate_lifecycles(
            vec![assigned(1, 10), assigned(2, 20)],
            vec![responded(2, 25, true)],
            20,
        );

        assert_eq!(lifecycles.len(), 2);
        assert_eq!(lifecycles[0].correlation_key, key(2));
        assert_eq!(lifecycles[0].status, LifecycleStatus::Concluded);
        assert_eq!(
            lifecycles[0].concluding_event.as_ref().map(|e| e.block_number),
            Some(25)
        );
        assert_eq!(lifecycles[1].correlation_key, key(1));
        assert_eq!(lifecycles[1].status, LifecycleStatus::Pending);
        assert!(lifecycles[1].concluding_event.is_none());
    }

    #[test]
    fn test_conclusion_without_initiation_is_synthesized() {
        let lifecycles = aggregate_lifecycles(vec![], vec![responded(3, 30, false)], 20);

        assert_eq!(lifecycles.len(), 1);
        let lifecycle = &lifecycles[0];
        assert_eq!(lifecycle.status, LifecycleStatus::Concluded);
        assert_eq!(lifecycle.initiating_event.block_number, 30);
        assert_eq!(
            Some(&lifecycle.initiating_event),
            lifecycle.concluding_event.as_ref()
        );
    }

    #[test]
    fn test_concluded_lifecycle_is_terminal() {
        let lifecycles = aggregate_lifecycles(
            vec![assigned(1, 10)],
            vec![responded(1, 11, true), responded(1, 12, false)],
            20,
        );

        assert_eq!(lifecycles.len(), 1);
        assert_eq!(
            lifecycles[0].concluding_event.as_ref().map(|e| e.block_number),
            Some(11)
        );
    }

    #[test]
    fn test_duplicate_initiation_is_last_write_wins() {
        let lifecycles =
            aggregate_lifecycles(vec![assigned(1, 10), assigned(1, 15)], Vec::new(), 20);

        assert_eq!(lifecycles.len(), 1);
        assert_eq!(lifecycles[0].initiating_event.block_number, 15);
        assert_eq!(lifecycles[0].status, LifecycleStatus::Pending);
    }

    #[test]
    fn test_replaced_initiation_keeps_conclusion() {
        let mut aggregator = LifecycleAggregator::new();
        aggregator.add_initiating(assigned(1, 10));
        aggregator.add_concluding(responded(1, 12, true));
        aggregator.add_initiating(assigned(1, 11));

        let lifecycles = aggregator.finish(20);
        assert_eq!(lifecycles[0].initiating_event.block_number, 11);
        assert_eq!(lifecycles[0].status, LifecycleStatus::Concluded);
    }

    #[test]
    fn test_sorted_newest_first_and_truncated() {
        let lifecycles = aggregate_lifecycles(
            vec![assigned(1, 5), assigned(2, 50), assigned(3, 20), assigned(4, 20)],
            Vec::new(),
            3,
        );

        let keys: Vec<B256> = lifecycles.iter().map(|l| l.correlation_key).collect();
        assert_eq!(keys, vec![key(2), key(3), key(4)]);
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let initiating = vec![assigned(1, 10), assigned(2, 20), assigned(3, 20)];
        let concluding = vec![responded(2, 25, true), responded(9, 40, false)];

        let first = aggregate_lifecycles(initiating.clone(), concluding.clone(), 20);
        let second = aggregate_lifecycles(initiating, concluding, 20);

        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_unmatched_initiation_stays_pending_across_passes() {
        for _ in 0..3 {
            let lifecycles = aggregate_lifecycles(vec![assigned(1, 10)], Vec::new(), 20);
            assert_eq!(LifecycleSummary::of(&lifecycles).pending, 1);
        }
    }

    #[test]
    fn test_empty_streams() {
        let lifecycles: Vec<Lifecycle<TaskEvent>> =
            aggregate_lifecycles(Vec::new(), Vec::new(), 20);
        assert!(lifecycles.is_empty());
    }
}
