//! # Lifecycle Indexer Pipeline
//! This crate turns contract events held by an external log-indexing service
//! into lifecycle records describing multi-step on-chain workflows.
//!
//! Stages, leaf first:
//! - [`codec`]: 20-byte addresses to and from 32-byte topic words
//! - [`signature`]: event signature canonicalization and hashing
//! - [`query`]: filter query construction
//! - [`decoder`]: topic, data-blob and timestamp decoding
//! - [`processor`]: raw rows to typed events through registered handlers
//! - [`aggregator`]: joining initiating and concluding events by key
//! - [`orchestrator`]: the discovery query and its dependent queries
pub mod aggregator;
pub mod codec;
pub mod decoder;
pub mod orchestrator;
pub mod processor;
pub mod query;
pub mod signature;

pub mod errors;
