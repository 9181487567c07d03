//! ARKIVA Core - Document and Cache Key Types
//!
//! Pure data structures shared by the cache, the backend adapters and the
//! presentation layer. This crate contains ONLY data types and pure
//! functions - no async, no I/O.

use chrono::{DateTime, Utc};

pub mod clock;
pub mod document;
pub mod error;
pub mod fingerprint;

pub use clock::{Clock, FixedClock, SystemClock};
pub use document::{Document, DocumentId, DocumentStatus};
pub use error::{ArkivaError, ArkivaResult, ConfigError, GenerationError};
pub use fingerprint::Fingerprint;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

// ============================================================================
// USER-FACING MESSAGES
// ============================================================================

/// Shown instead of requesting a new summary once a document version has
/// used up its generation allowance.
pub const QUOTA_EXCEEDED_MESSAGE: &str =
    "The generation limit for this document has been reached. Try again later.";

/// Fallback banner when the backend fails without a usable message.
pub const GENERATION_FAILED_MESSAGE: &str = "Failed to generate the AI summary.";

/// Fallback banner when the document itself cannot be loaded.
pub const DOCUMENT_FETCH_FAILED_MESSAGE: &str = "Could not load the document.";
