//! Decoding of topic words and data blobs into typed scalars.
//!
//! Only elementary static types are supported: `address`, `bool`, `uintN`,
//! `intN` and `bytesN`. Every such value occupies exactly one 32-byte word.
mod timestamp;

pub use timestamp::{normalize_timestamp, parse_block_timestamp, UNPARSEABLE_TIMESTAMP};

use alloy::hex;
use alloy::primitives::{Address, Bytes, B256, I256, U256};
use lifecycle_indexer_shared::types::{DecodedField, DecodedFields, DecodedValue, EventParam};

use crate::errors::DecodeError;

const WORD_SIZE: usize = 32;

/// Layout of a single ABI type as far as decoding is concerned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbiType {
    Address,
    Bool,
    Uint(usize),
    Int(usize),
    FixedBytes(usize),
    /// `string`, `bytes`, arrays and anything else that is not one word.
    Dynamic(String),
}

impl AbiType {
    /// Classifies a canonical type name as produced by the signature parser.
    pub fn parse(ty: &str) -> Self {
        if ty.contains('[') {
            return AbiType::Dynamic(ty.to_string());
        }
        match ty {
            "address" => AbiType::Address,
            "bool" => AbiType::Bool,
            _ => {
                if let Some(bits) = ty.strip_prefix("uint").and_then(|n| n.parse().ok()) {
                    AbiType::Uint(bits)
                } else if let Some(bits) = ty.strip_prefix("int").and_then(|n| n.parse().ok()) {
                    AbiType::Int(bits)
                } else if let Some(size) = ty.strip_prefix("bytes").and_then(|n| n.parse().ok()) {
                    AbiType::FixedBytes(size)
                } else {
                    AbiType::Dynamic(ty.to_string())
                }
            }
        }
    }

    pub fn is_static(&self) -> bool {
        !matches!(self, AbiType::Dynamic(_))
    }
}

/// Parses a `0x`-prefixed 32-byte hex word.
pub fn parse_word(raw: &str) -> Result<B256, DecodeError> {
    let bytes = hex::decode(raw.trim()).map_err(|e| DecodeError::InvalidHex(e.to_string()))?;
    if bytes.len() != WORD_SIZE {
        return Err(DecodeError::InvalidWordLength(bytes.len()));
    }
    Ok(B256::from_slice(&bytes))
}

/// Interprets one word as a value of a static type.
///
/// `bool` reads the parity of the last byte, so any odd trailing byte is
/// `true`. Strict ABI decoding would reject words other than 0 and 1.
pub fn decode_word(ty: &AbiType, word: &B256) -> Result<DecodedValue, DecodeError> {
    match ty {
        AbiType::Address => Ok(DecodedValue::Address(Address::from_word(*word))),
        AbiType::Bool => Ok(DecodedValue::Bool(word[WORD_SIZE - 1] & 1 == 1)),
        AbiType::Uint(_) => Ok(DecodedValue::Uint(U256::from_be_bytes(word.0))),
        AbiType::Int(_) => Ok(DecodedValue::Int(I256::from_raw(U256::from_be_bytes(
            word.0,
        )))),
        AbiType::FixedBytes(size) if (1..=WORD_SIZE).contains(size) => {
            Ok(DecodedValue::FixedBytes(Bytes::copy_from_slice(&word[..*size])))
        }
        AbiType::FixedBytes(size) => Err(DecodeError::UnsupportedType(format!("bytes{size}"))),
        AbiType::Dynamic(name) => Err(DecodeError::UnsupportedType(name.clone())),
    }
}

/// Decodes the hex word found in a topic slot.
///
/// Indexed dynamic values are stored on chain as the hash of their contents;
/// for those the raw 32-byte hash is returned.
pub fn decode_topic(ty: &str, raw: &str) -> Result<DecodedValue, DecodeError> {
    let word = parse_word(raw)?;
    match AbiType::parse(ty) {
        AbiType::Dynamic(_) => Ok(DecodedValue::FixedBytes(Bytes::copy_from_slice(&word[..]))),
        abi_type => decode_word(&abi_type, &word),
    }
}

/// Decodes the non-indexed parameters packed into a data blob, one word
/// each, in declaration order.
pub fn decode_data(types: &[&str], raw: &str) -> Result<Vec<DecodedValue>, DecodeError> {
    let data = hex::decode(raw.trim()).map_err(|e| DecodeError::InvalidHex(e.to_string()))?;

    types
        .iter()
        .enumerate()
        .map(|(index, ty)| {
            let abi_type = AbiType::parse(ty);
            if !abi_type.is_static() {
                return Err(DecodeError::UnsupportedType(ty.to_string()));
            }
            let end = (index + 1) * WORD_SIZE;
            let chunk = data.get(index * WORD_SIZE..end).ok_or(DecodeError::DataTooShort {
                expected: end,
                actual: data.len(),
            })?;
            decode_word(&abi_type, &B256::from_slice(chunk))
        })
        .collect()
}

/// Decodes every parameter of an event given the hex strings of its indexed
/// topics (slots 1.. in order) and its data blob.
pub fn decode_params(
    params: &[EventParam],
    topics: &[&str],
    data: Option<&str>,
) -> Result<DecodedFields, DecodeError> {
    let data_types: Vec<&str> = params
        .iter()
        .filter(|param| !param.indexed)
        .map(|param| param.ty.as_str())
        .collect();
    let data_values = if data_types.is_empty() {
        Vec::new()
    } else {
        let raw = data.ok_or_else(|| DecodeError::MissingColumn("data".to_string()))?;
        decode_data(&data_types, raw)?
    };
    let mut data_values = data_values.into_iter();

    let mut position = 0;
    let mut fields = DecodedFields::new();
    for param in params {
        let value = if param.indexed {
            position += 1;
            let column = format!("topics[{position}]");
            let raw = topics
                .get(position - 1)
                .ok_or_else(|| DecodeError::MissingColumn(column.clone()))?;
            decode_topic(&param.ty, raw)
                .map_err(|e| DecodeError::invalid_column(column, e.to_string()))?
        } else {
            data_values
                .next()
                .ok_or_else(|| DecodeError::MissingColumn("data".to_string()))?
        };
        fields.push(DecodedField {
            name: param.name.clone(),
            ty: param.ty.clone(),
            value,
        });
    }
    Ok(fields)
}
