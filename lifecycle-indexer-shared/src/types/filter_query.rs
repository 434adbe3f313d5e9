use std::fmt;

use alloy::hex;
use alloy::primitives::{Address, BlockNumber, B256};
use serde::{Deserialize, Serialize};

/// A 32-byte topic slot value: a signature hash, a padded address, or
/// another padded indexed scalar.
pub type TopicWord = B256;

/// Name of the log table exposed by the indexing service.
pub const LOG_TABLE: &str = "logs";

/// A column of the log table that a query can select or order by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    BlockNum,
    BlockTimestamp,
    TxHash,
    /// `topics[n]`; slot 0 holds the signature hash.
    Topic(u8),
    Data,
}

impl Column {
    /// Name of the column as it appears in the query text and in the
    /// service's reply.
    pub fn name(&self) -> String {
        match self {
            Column::BlockNum => "block_num".to_string(),
            Column::BlockTimestamp => "block_timestamp".to_string(),
            Column::TxHash => "tx_hash".to_string(),
            Column::Topic(position) => format!("topics[{}]", position),
            Column::Data => "data".to_string(),
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    fn keyword(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderBy {
    pub column: Column,
    pub direction: SortDirection,
}

impl Default for OrderBy {
    fn default() -> Self {
        Self {
            column: Column::BlockNum,
            direction: SortDirection::Descending,
        }
    }
}

/// Equality predicate on one topic slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TopicConstraint {
    pub position: u8,
    pub word: TopicWord,
}

/// A filter over the indexing service's log table.
///
/// Instances are produced by the query builder, which guarantees that
/// `topic_constraints` starts with the signature hash at position 0 and is
/// sorted by position. `chain_id` and `contract_address` are not optional, so
/// a query can never scan the whole chain's log space.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterQuery {
    pub chain_id: u64,
    pub contract_address: Address,
    pub topic_constraints: Vec<TopicConstraint>,
    pub starting_block: Option<BlockNumber>,
    pub selected_columns: Vec<Column>,
    pub order_by: OrderBy,
    pub limit: u32,
    /// Human-authored event declarations sent alongside the query text.
    pub signatures: Vec<String>,
}

impl FilterQuery {
    /// Returns a copy of this query bounded below by `block` (inclusive).
    pub fn with_starting_block(&self, block: BlockNumber) -> Self {
        Self {
            starting_block: Some(block),
            ..self.clone()
        }
    }

    /// The word constrained at `position`, if any.
    pub fn topic(&self, position: u8) -> Option<TopicWord> {
        self.topic_constraints
            .iter()
            .find(|constraint| constraint.position == position)
            .map(|constraint| constraint.word)
    }

    /// The signature hash this query filters on.
    pub fn signature_hash(&self) -> Option<TopicWord> {
        self.topic(0)
    }

    /// Renders the query in the service's textual grammar:
    ///
    /// `SELECT <columns> FROM logs WHERE chain = <id> AND address = <contract>
    /// AND topics[<n>] = <word> [AND block_num >= <n>] ORDER BY <column>
    /// <direction> LIMIT <n>`
    ///
    /// Every interpolated value is a number or a fixed-width hex literal.
    pub fn to_sql(&self) -> String {
        let columns: Vec<String> = self.selected_columns.iter().map(Column::name).collect();

        let mut predicates = vec![
            format!("chain = {}", self.chain_id),
            format!("address = {}", hex::encode_prefixed(self.contract_address)),
        ];
        for constraint in &self.topic_constraints {
            predicates.push(format!(
                "{} = {}",
                Column::Topic(constraint.position).name(),
                hex::encode_prefixed(constraint.word)
            ));
        }
        if let Some(block) = self.starting_block {
            predicates.push(format!("{} >= {}", Column::BlockNum.name(), block));
        }

        format!(
            "SELECT {} FROM {} WHERE {} ORDER BY {} {} LIMIT {}",
            columns.join(", "),
            LOG_TABLE,
            predicates.join(" AND "),
            self.order_by.column.name(),
            self.order_by.direction.keyword(),
            self.limit
        )
    }
}

impl fmt::Display for FilterQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}
