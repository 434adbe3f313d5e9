mod configuration;
mod decode;
mod format;
mod orchestrator;

pub use configuration::ConfigurationError;
pub use decode::DecodeError;
pub use format::FormatError;
pub use orchestrator::{DependentQueryError, OrchestratorError};
