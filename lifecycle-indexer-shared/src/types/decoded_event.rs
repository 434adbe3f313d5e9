use alloy::primitives::{Address, BlockNumber, Bytes, TxHash, B256, I256, U256};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// A scalar decoded from a topic word or a data-blob word.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DecodedValue {
    Address(Address),
    Bool(bool),
    Uint(U256),
    Int(I256),
    /// `bytesN`, truncated to its declared width.
    FixedBytes(Bytes),
}

impl DecodedValue {
    pub fn as_address(&self) -> Option<Address> {
        match self {
            DecodedValue::Address(address) => Some(*address),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DecodedValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_uint(&self) -> Option<U256> {
        match self {
            DecodedValue::Uint(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<I256> {
        match self {
            DecodedValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// The value as a full 32-byte word, for `bytes32` fields.
    pub fn as_bytes32(&self) -> Option<B256> {
        match self {
            DecodedValue::FixedBytes(bytes) if bytes.len() == 32 => {
                Some(B256::from_slice(bytes.as_ref()))
            }
            _ => None,
        }
    }
}

/// One decoded event parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedField {
    pub name: Option<String>,
    pub ty: String,
    pub value: DecodedValue,
}

/// All parameters of one log entry, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedFields {
    fields: Vec<DecodedField>,
}

impl DecodedFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: DecodedField) {
        self.fields.push(field);
    }

    /// Looks a parameter up by its declared name.
    pub fn get(&self, name: &str) -> Option<&DecodedValue> {
        self.fields
            .iter()
            .find(|field| field.name.as_deref() == Some(name))
            .map(|field| &field.value)
    }

    /// Looks a parameter up by its declaration index.
    pub fn at(&self, index: usize) -> Option<&DecodedValue> {
        self.fields.get(index).map(|field| &field.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DecodedField> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A typed event together with the log metadata it was read from.
///
/// `block_timestamp` is `None` when the service sent a timestamp that could
/// not be normalized; the rest of the event is still usable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedEvent<E> {
    pub event: E,
    pub block_number: BlockNumber,
    pub block_timestamp: Option<DateTime<FixedOffset>>,
    pub transaction_hash: TxHash,
}
