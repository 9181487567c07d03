//! Error types for ARKIVA operations

use crate::{DocumentId, GENERATION_FAILED_MESSAGE};
use thiserror::Error;

/// Failures of the backend collaborators (summary generation and document fetch).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GenerationError {
    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Backend returned status {status}: {message}")]
    Backend { status: u16, message: String },

    #[error("Document not found: {document_id}")]
    NotFound { document_id: DocumentId },

    #[error("Invalid response: {reason}")]
    InvalidResponse { reason: String },

    /// The task running the backend call panicked or was cancelled.
    #[error("Request interrupted: {reason}")]
    Interrupted { reason: String },
}

impl GenerationError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn backend(status: u16, message: impl Into<String>) -> Self {
        Self::Backend {
            status,
            message: message.into(),
        }
    }

    pub fn interrupted(reason: impl Into<String>) -> Self {
        Self::Interrupted {
            reason: reason.into(),
        }
    }

    /// Text for the error banner. Network and backend messages are surfaced
    /// verbatim; anything without a usable message falls back to a fixed text.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network { message } | Self::Backend { message, .. }
                if !message.trim().is_empty() =>
            {
                message.clone()
            }
            Self::NotFound { .. } => "Document not found".to_string(),
            _ => GENERATION_FAILED_MESSAGE.to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Master error type for all ARKIVA errors.
#[derive(Debug, Clone, Error)]
pub enum ArkivaError {
    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for ARKIVA operations.
pub type ArkivaResult<T> = Result<T, ArkivaError>;

// =============================================================================
// TESTS
// =============================================================================
