//! Configuration module for the Lifecycle Indexer.
//! Reads settings from the environment and wires the pipeline's dependencies.
mod dependencies;
pub mod handlers;
mod settings;

pub use dependencies::Dependencies;
pub use settings::Settings;
