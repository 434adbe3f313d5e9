//! Mock indexer gateway for testing and local development.
//!
//! The `MockIndexerGateway` is pre-populated with rows per event signature
//! hash and evaluates each query's filter against them the way the hosted
//! service would: topic equality, the `block_num` lower bound, ordering and
//! limit.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use alloy::primitives::B256;
use async_trait::async_trait;
use lifecycle_indexer_shared::types::{
    Column, FilterQuery, RawEventRow, SortDirection, TopicConstraint,
};

use crate::errors::TransportError;
use crate::interfaces::IndexerGateway;

/// In-memory gateway keyed by signature hash (topic 0).
#[derive(Default)]
pub struct MockIndexerGateway {
    rows: RwLock<HashMap<B256, Vec<RawEventRow>>>,
    failing: RwLock<HashSet<B256>>,
    executed: RwLock<Vec<FilterQuery>>,
}

impl MockIndexerGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register rows returned for queries on `signature_hash`.
    ///
    /// Rows must carry the `topics[n]` columns that queries constrain on;
    /// a row without the constrained column does not match.
    pub fn register_rows(&self, signature_hash: B256, rows: Vec<RawEventRow>) {
        self.rows
            .write()
            .unwrap()
            .entry(signature_hash)
            .or_default()
            .extend(rows);
    }

    /// Make every query on `signature_hash` fail with a server error.
    pub fn fail_on(&self, signature_hash: B256) {
        self.failing.write().unwrap().insert(signature_hash);
    }

    /// Every query executed so far, in submission order.
    pub fn executed_queries(&self) -> Vec<FilterQuery> {
        self.executed.read().unwrap().clone()
    }

    pub fn execution_count(&self) -> usize {
        self.executed.read().unwrap().len()
    }
}

#[async_trait]
impl IndexerGateway for MockIndexerGateway {
    async fn execute(&self, query: &FilterQuery) -> Result<Vec<RawEventRow>, TransportError> {
        self.executed.write().unwrap().push(query.clone());

        let Some(signature_hash) = query.signature_hash() else {
            return Ok(Vec::new());
        };

        if self.failing.read().unwrap().contains(&signature_hash) {
            return Err(TransportError::status(
                500,
                format!("mock failure for {}", signature_hash),
            ));
        }

        let mut matched: Vec<RawEventRow> = self
            .rows
            .read()
            .unwrap()
            .get(&signature_hash)
            .map(|rows| {
                rows.iter()
                    .filter(|row| matches_query(row, query))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        matched.sort_by_key(|row| row.block_num().unwrap_or_default());
        if query.order_by.direction == SortDirection::Descending {
            matched.reverse();
        }
        matched.truncate(query.limit as usize);

        Ok(matched)
    }
}

fn matches_query(row: &RawEventRow, query: &FilterQuery) -> bool {
    let above_lower_bound = match query.starting_block {
        Some(start) => row.block_num().is_some_and(|block| block >= start),
        None => true,
    };

    above_lower_bound
        && query
            .topic_constraints
            .iter()
            .filter(|constraint| constraint.position > 0)
            .all(|constraint| matches_topic(row, constraint))
}

fn matches_topic(row: &RawEventRow, constraint: &TopicConstraint) -> bool {
    row.get_str(&Column::Topic(constraint.position).name())
        .and_then(|text| text.parse::<B256>().ok())
        .is_some_and(|word| word == constraint.word)
}
