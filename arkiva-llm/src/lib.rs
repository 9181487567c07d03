//! ARKIVA LLM - Backend collaborator traits
//!
//! The summary pipeline treats the backend as two opaque async operations:
//! producing a summary for a document, and fetching the document itself.
//! This crate defines those interfaces, the HTTP implementation against the
//! Arkiva REST backend, and deterministic mocks for tests.

use arkiva_core::{Document, DocumentId, GenerationError};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};

pub mod providers;

pub use providers::{ArkivaBackend, BackendConfig};

// ============================================================================
// COLLABORATOR TRAITS
// ============================================================================

/// Produces the AI summary of a document.
///
/// Idempotent from the caller's point of view: repeated calls are safe but
/// not free, which is why the cache bounds how often they happen.
///
/// # Example
/// ```ignore
/// let summary = generator.generate_summary(DocumentId::new(7)).await?;
/// ```
#[async_trait]
pub trait SummaryGenerator: Send + Sync {
    /// Generate a summary for the document.
    ///
    /// # Returns
    /// * `Ok(String)` - The summary (may be empty)
    /// * `Err(GenerationError)` - On any backend or network fault
    async fn generate_summary(&self, document_id: DocumentId) -> Result<String, GenerationError>;
}

/// Loads a document with its version markers and display fields.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Fetch a document by id.
    ///
    /// # Returns
    /// * `Err(GenerationError::NotFound)` - If the backend has no such document
    /// * `Err(GenerationError::Network)` - On transport faults
    async fn fetch_document(&self, document_id: DocumentId) -> Result<Document, GenerationError>;
}

// ============================================================================
// MOCK GENERATOR FOR TESTING
// ============================================================================

/// Mock summary generator that answers immediately.
#[derive(Debug)]
pub struct MockSummaryGenerator {
    /// Prefix to add to summaries
    prefix: String,
    /// Error returned instead of a summary, when set
    failure: Option<GenerationError>,
    calls: AtomicU64,
}

impl MockSummaryGenerator {
    /// Create a mock generator producing `"Summary of document {id}"`.
    pub fn new() -> Self {
        Self::with_prefix("Summary of document ")
    }

    /// Create a mock generator with a custom prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            failure: None,
            calls: AtomicU64::new(0),
        }
    }

    /// Create a mock generator that always fails with `error`.
    pub fn failing(error: GenerationError) -> Self {
        Self {
            prefix: String::new(),
            failure: Some(error),
            calls: AtomicU64::new(0),
        }
    }

    /// Number of generation calls received so far.
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }
}

impl Default for MockSummaryGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SummaryGenerator for MockSummaryGenerator {
    async fn generate_summary(&self, document_id: DocumentId) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(format!("{}{}", self.prefix, document_id)),
        }
    }
}

// ============================================================================
// UNIT TESTS
// ============================================================================
