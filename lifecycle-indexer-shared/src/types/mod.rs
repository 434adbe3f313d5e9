mod decoded_event;
mod event_signature;
mod filter_query;
mod lifecycle;
mod raw_event_row;
mod task_event;

pub use decoded_event::{DecodedEvent, DecodedField, DecodedFields, DecodedValue};
pub use event_signature::{EventParam, EventSignature, EventSignatureHash};
pub use filter_query::{
    Column, FilterQuery, OrderBy, SortDirection, TopicConstraint, TopicWord, LOG_TABLE,
};
pub use lifecycle::{Lifecycle, LifecycleEvent, LifecycleStatus, LifecycleSummary};
pub use raw_event_row::RawEventRow;
pub use task_event::{TaskAssigned, TaskEvent, TaskResponded};
