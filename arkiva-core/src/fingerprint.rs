//! Cache keys for generated summaries.
//!
//! A [`Fingerprint`] names one *version* of a document. Any edit that bumps
//! the version marker, or a file replacement that changes the external
//! storage id, yields a different fingerprint and therefore a cache miss.
//! Old fingerprints are never invalidated explicitly; their entries simply
//! age out.

use crate::{Document, DocumentId, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Composite key identifying a specific version of a document.
///
/// Two fingerprints are equal iff all three components are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint {
    document_id: DocumentId,
    version_marker: Timestamp,
    storage_id: String,
}

impl Fingerprint {
    pub fn new(
        document_id: DocumentId,
        version_marker: Timestamp,
        storage_id: impl Into<String>,
    ) -> Self {
        Self {
            document_id,
            version_marker,
            storage_id: storage_id.into(),
        }
    }

    /// Derive the fingerprint of a document. Pure and total.
    pub fn of(doc: &Document) -> Self {
        Self::new(doc.id, doc.updated_at, doc.drive_file_id.as_str())
    }

    pub fn document_id(&self) -> DocumentId {
        self.document_id
    }

    pub fn version_marker(&self) -> Timestamp {
        self.version_marker
    }

    pub fn storage_id(&self) -> &str {
        &self.storage_id
    }
}

impl From<&Document> for Fingerprint {
    fn from(doc: &Document) -> Self {
        Self::of(doc)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.document_id,
            self.version_marker.to_rfc3339(),
            self.storage_id
        )
    }
}
