//! Typed accessors for handler implementations.
use alloy::primitives::{Address, B256, U256};
use lifecycle_indexer_shared::types::{DecodedFields, DecodedValue};

use crate::errors::DecodeError;

fn typed_field<T>(
    fields: &DecodedFields,
    name: &str,
    expected: &str,
    extract: impl FnOnce(&DecodedValue) -> Option<T>,
) -> Result<T, DecodeError> {
    let value = fields
        .get(name)
        .ok_or_else(|| DecodeError::MissingField(name.to_string()))?;
    extract(value).ok_or_else(|| DecodeError::field_type(name, expected))
}

pub fn address_field(fields: &DecodedFields, name: &str) -> Result<Address, DecodeError> {
    typed_field(fields, name, "address", DecodedValue::as_address)
}

pub fn bytes32_field(fields: &DecodedFields, name: &str) -> Result<B256, DecodeError> {
    typed_field(fields, name, "bytes32", DecodedValue::as_bytes32)
}

pub fn uint_field(fields: &DecodedFields, name: &str) -> Result<U256, DecodeError> {
    typed_field(fields, name, "uint", DecodedValue::as_uint)
}

pub fn bool_field(fields: &DecodedFields, name: &str) -> Result<bool, DecodeError> {
    typed_field(fields, name, "bool", DecodedValue::as_bool)
}
