//! Error types for the TUI.

use crate::config::ConfigError;
use arkiva_core::GenerationError;

#[derive(Debug, thiserror::Error)]
pub enum TuiError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Backend(#[from] GenerationError),
    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}
