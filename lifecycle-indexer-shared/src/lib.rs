//! # Lifecycle Indexer Shared
//! This crate defines the data model shared across the lifecycle indexer:
//! event signatures, filter queries and their textual rendering, raw and
//! decoded event rows, and the lifecycle records built from them.
pub mod types;
