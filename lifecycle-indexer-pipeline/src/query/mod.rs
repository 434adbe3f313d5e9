//! Construction of filter queries over the indexing service's log table.
//!
//! The builder is the only producer of [`FilterQuery`] values. It pins every
//! query to one chain and one contract, puts the signature hash at topic 0
//! and rejects constraints that would name a topic slot the event does not
//! have.
use std::collections::BTreeMap;
use std::str::FromStr;

use alloy::primitives::{Address, BlockNumber, B256, U256};
use lifecycle_indexer_shared::types::{
    Column, EventSignature, FilterQuery, OrderBy, SortDirection, TopicConstraint, TopicWord,
};

use crate::codec::pad_address;
use crate::errors::ConfigurationError;
use crate::signature::{hash_signature, parse_signature};

pub const DEFAULT_QUERY_LIMIT: u32 = 100;
pub const MAX_QUERY_LIMIT: u32 = 1000;

/// The chain and contract every query is scoped to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractConfig {
    pub chain_id: u64,
    pub address: String,
}

impl ContractConfig {
    pub fn new(chain_id: u64, address: impl Into<String>) -> Self {
        Self {
            chain_id,
            address: address.into(),
        }
    }

    /// Parses the configured address. An empty address is refused rather
    /// than widening the query to every contract on the chain.
    pub fn contract_address(&self) -> Result<Address, ConfigurationError> {
        let raw = self.address.trim();
        if raw.is_empty() {
            return Err(ConfigurationError::MissingContractAddress);
        }
        Address::from_str(raw)
            .map_err(|_| ConfigurationError::InvalidContractAddress(raw.to_string()))
    }
}

/// A value to match in an indexed topic slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicValue {
    Address(Address),
    Word(B256),
    Uint(U256),
    Bool(bool),
}

impl TopicValue {
    /// The 32-byte word the value occupies in a topic slot.
    pub fn to_word(&self) -> TopicWord {
        match self {
            TopicValue::Address(address) => pad_address(*address),
            TopicValue::Word(word) => *word,
            TopicValue::Uint(value) => B256::from(*value),
            TopicValue::Bool(flag) => B256::from(U256::from(u8::from(*flag))),
        }
    }
}

impl From<Address> for TopicValue {
    fn from(address: Address) -> Self {
        TopicValue::Address(address)
    }
}

impl From<B256> for TopicValue {
    fn from(word: B256) -> Self {
        TopicValue::Word(word)
    }
}

/// Per-query knobs. Defaults to newest-first, 100 rows, no lower bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    pub starting_block: Option<BlockNumber>,
    pub limit: u32,
    pub direction: SortDirection,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            starting_block: None,
            limit: DEFAULT_QUERY_LIMIT,
            direction: SortDirection::Descending,
        }
    }
}

impl QueryOptions {
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_starting_block(mut self, block: BlockNumber) -> Self {
        self.starting_block = Some(block);
        self
    }

    pub fn ascending(mut self) -> Self {
        self.direction = SortDirection::Ascending;
        self
    }
}

#[derive(Debug, Clone)]
pub struct QueryBuilder {
    contract: ContractConfig,
}

impl QueryBuilder {
    pub fn new(contract: ContractConfig) -> Self {
        Self { contract }
    }

    pub fn contract(&self) -> &ContractConfig {
        &self.contract
    }

    /// Builds a query for `signature`, constraining topic slots by position.
    ///
    /// Position 0 is reserved for the signature hash; positions 1..=k refer
    /// to the event's k indexed parameters.
    pub fn build(
        &self,
        signature: &str,
        topic_values: &BTreeMap<u8, TopicValue>,
        options: &QueryOptions,
    ) -> Result<FilterQuery, ConfigurationError> {
        let contract_address = self.contract.contract_address()?;
        let parsed = parse_signature(signature)?;

        if !(1..=MAX_QUERY_LIMIT).contains(&options.limit) {
            return Err(ConfigurationError::LimitOutOfRange {
                provided: options.limit,
                max: MAX_QUERY_LIMIT,
            });
        }

        let indexed = parsed.indexed_count();
        let mut topic_constraints = vec![TopicConstraint {
            position: 0,
            word: hash_signature(&parsed),
        }];
        for (&position, value) in topic_values {
            if position == 0 {
                return Err(ConfigurationError::ReservedTopicPosition);
            }
            if usize::from(position) > indexed {
                return Err(ConfigurationError::TopicPositionOutOfRange { position, indexed });
            }
            topic_constraints.push(TopicConstraint {
                position,
                word: value.to_word(),
            });
        }

        Ok(FilterQuery {
            chain_id: self.contract.chain_id,
            contract_address,
            topic_constraints,
            starting_block: options.starting_block,
            selected_columns: selected_columns(&parsed),
            order_by: OrderBy {
                column: Column::BlockNum,
                direction: options.direction,
            },
            limit: options.limit,
            signatures: vec![signature.to_string()],
        })
    }
}

/// Block metadata, every indexed topic, and the data blob when the event has
/// non-indexed parameters.
fn selected_columns(signature: &EventSignature) -> Vec<Column> {
    let mut columns = vec![Column::BlockNum, Column::BlockTimestamp, Column::TxHash];
    for position in 1..=signature.indexed_count() {
        // at most three indexed slots exist on the EVM
        if let Ok(position) = u8::try_from(position) {
            columns.push(Column::Topic(position));
        }
    }
    if signature.has_data() {
        columns.push(Column::Data);
    }
    columns
}
