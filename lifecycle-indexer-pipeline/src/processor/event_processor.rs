use std::collections::HashMap;
use std::sync::Arc;

use alloy::primitives::TxHash;
use chrono::{DateTime, FixedOffset};
use lifecycle_indexer_shared::types::{
    Column, DecodedEvent, EventSignature, EventSignatureHash, RawEventRow,
};
use serde_json::Value;
use tracing::{debug, warn};

use crate::decoder::{decode_params, parse_block_timestamp, parse_word};
use crate::errors::{DecodeError, FormatError};
use crate::processor::HandleEvent;
use crate::signature::SignatureRegistry;

/// `EventProcessor` turns raw rows returned by the indexing service into
/// typed events.
/// It keeps a registry of handlers keyed by event signature hash.
pub struct EventProcessor<E> {
    signatures: SignatureRegistry,
    handler_registry: HashMap<EventSignatureHash, Arc<dyn HandleEvent<E>>>,
}

impl<E> Default for EventProcessor<E> {
    fn default() -> Self {
        Self {
            signatures: SignatureRegistry::new(),
            handler_registry: HashMap::new(),
        }
    }
}

impl<E> EventProcessor<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler for the event declared by `signature`.
    ///
    /// # Returns
    ///
    /// The signature hash rows of this event carry in topic slot 0.
    pub fn register_handler(
        &mut self,
        signature: &str,
        handler: Arc<dyn HandleEvent<E>>,
    ) -> Result<EventSignatureHash, FormatError> {
        let hash = self.signatures.register(signature)?;
        self.handler_registry.insert(hash, handler);
        Ok(hash)
    }

    pub fn has_handler(&self, signature_hash: &EventSignatureHash) -> bool {
        self.handler_registry.contains_key(signature_hash)
    }

    pub fn signature(&self, signature_hash: &EventSignatureHash) -> Option<&EventSignature> {
        self.signatures.get(signature_hash)
    }

    /// Decodes every row of a query for `signature_hash`.
    ///
    /// Rows that fail to decode are dropped with a warning; the remaining
    /// rows are returned in their original order.
    pub fn process(
        &self,
        signature_hash: &EventSignatureHash,
        rows: &[RawEventRow],
    ) -> Result<Vec<DecodedEvent<E>>, DecodeError> {
        let (signature, handler) = self
            .signatures
            .get(signature_hash)
            .zip(self.handler_registry.get(signature_hash))
            .ok_or_else(|| DecodeError::UnregisteredSignature(signature_hash.to_string()))?;

        let mut events = Vec::with_capacity(rows.len());
        for row in rows {
            match decode_row(signature, handler.as_ref(), row) {
                Ok(event) => events.push(event),
                Err(e) => warn!(
                    event = %signature.name,
                    block_num = ?row.block_num(),
                    error = %e,
                    "Dropping row that failed to decode"
                ),
            }
        }
        Ok(events)
    }
}

fn decode_row<E>(
    signature: &EventSignature,
    handler: &dyn HandleEvent<E>,
    row: &RawEventRow,
) -> Result<DecodedEvent<E>, DecodeError> {
    let block_column = Column::BlockNum.name();
    let block_number = match row.get(&block_column) {
        None => return Err(DecodeError::MissingColumn(block_column)),
        Some(_) => row
            .block_num()
            .ok_or_else(|| DecodeError::invalid_column(&block_column, "not a block number"))?,
    };

    let tx_column = Column::TxHash.name();
    let tx_hash = row
        .get_str(&tx_column)
        .ok_or_else(|| DecodeError::MissingColumn(tx_column.clone()))?;
    let transaction_hash: TxHash =
        parse_word(tx_hash).map_err(|e| DecodeError::invalid_column(&tx_column, e.to_string()))?;

    let topic_columns: Vec<String> = (1..=signature.indexed_count())
        .map(|position| format!("topics[{position}]"))
        .collect();
    let topics = topic_columns
        .iter()
        .map(|column| {
            row.get_str(column)
                .ok_or_else(|| DecodeError::MissingColumn(column.clone()))
        })
        .collect::<Result<Vec<&str>, _>>()?;
    let data = row.get_str(&Column::Data.name());

    let fields = decode_params(&signature.params, &topics, data)?;
    let event = handler.handle(&fields)?;

    Ok(DecodedEvent {
        event,
        block_number,
        block_timestamp: block_timestamp(row, block_number),
        transaction_hash,
    })
}

/// A timestamp that cannot be read degrades to `None` instead of
/// discarding the row.
fn block_timestamp(row: &RawEventRow, block_number: u64) -> Option<DateTime<FixedOffset>> {
    let parsed = match row.get(&Column::BlockTimestamp.name()) {
        Some(Value::String(raw)) => parse_block_timestamp(raw),
        Some(Value::Number(seconds)) => seconds
            .as_i64()
            .and_then(|seconds| DateTime::from_timestamp(seconds, 0))
            .map(|timestamp| timestamp.fixed_offset()),
        _ => None,
    };
    if parsed.is_none() {
        debug!(block_num = block_number, "Block timestamp missing or unparseable");
    }
    parsed
}
