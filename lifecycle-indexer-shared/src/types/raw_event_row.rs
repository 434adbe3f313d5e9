use std::collections::HashMap;

use alloy::primitives::BlockNumber;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One row of the indexing service's reply, keyed by column name.
///
/// Values are kept exactly as the service sent them. Rows are short lived:
/// the decoder turns them into typed events immediately after the gateway
/// returns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEventRow {
    columns: HashMap<String, Value>,
}

impl RawEventRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: impl Into<String>, value: Value) {
        self.columns.insert(column.into(), value);
    }

    /// Builder-style variant of [`RawEventRow::insert`].
    pub fn with(mut self, column: impl Into<String>, value: Value) -> Self {
        self.insert(column, value);
        self
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns.get(column)
    }

    /// The column as text, for columns the service sends as strings.
    pub fn get_str(&self, column: &str) -> Option<&str> {
        self.get(column).and_then(Value::as_str)
    }

    /// Block number of the row. The service sends it either as a JSON number
    /// or as a decimal string.
    pub fn block_num(&self) -> Option<BlockNumber> {
        match self.get("block_num")? {
            Value::Number(number) => number.as_u64(),
            Value::String(text) => text.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl FromIterator<(String, Value)> for RawEventRow {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}
