mod event_processor;
mod fields;

pub use event_processor::EventProcessor;
pub use fields::{address_field, bool_field, bytes32_field, uint_field};

use lifecycle_indexer_shared::types::DecodedFields;

use crate::errors::DecodeError;

/// Turns the decoded parameters of one event signature into the caller's
/// event type.
pub trait HandleEvent<E>: Send + Sync {
    fn handle(&self, fields: &DecodedFields) -> Result<E, DecodeError>;
}
