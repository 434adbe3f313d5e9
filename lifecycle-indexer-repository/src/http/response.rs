//! Reply shapes of the indexing service and their flattening into rows.

use lifecycle_indexer_shared::types::RawEventRow;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
}

/// One result table: column descriptors plus positional rows.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResultTable {
    pub columns: Vec<ColumnDescriptor>,
    #[serde(default)]
    pub rows: Vec<Vec<Value>>,
}

/// The service replies with either a single table or an array of tables.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum QueryResponse {
    Many(Vec<ResultTable>),
    Single(ResultTable),
}

impl QueryResponse {
    pub fn into_tables(self) -> Vec<ResultTable> {
        match self {
            QueryResponse::Many(tables) => tables,
            QueryResponse::Single(table) => vec![table],
        }
    }

    /// Flattens every table into rows keyed by column name.
    pub fn into_rows(self) -> Vec<RawEventRow> {
        flatten_tables(self.into_tables())
    }
}

/// Turns positional rows into column-keyed rows, keeping row order within
/// each table and table order across the reply.
pub fn flatten_tables(tables: Vec<ResultTable>) -> Vec<RawEventRow> {
    let mut rows = Vec::new();
    for table in tables {
        for values in table.rows {
            if values.len() != table.columns.len() {
                warn!(
                    columns = table.columns.len(),
                    values = values.len(),
                    "Row width does not match column count"
                );
            }
            rows.push(
                table
                    .columns
                    .iter()
                    .map(|column| column.name.clone())
                    .zip(values)
                    .collect(),
            );
        }
    }
    rows
}
