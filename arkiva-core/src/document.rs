//! Document records as served by the Arkiva REST backend.

use crate::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Backend identifier of a document (integer primary key).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(i64);

impl DocumentId {
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for DocumentId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Active,
    Archived,
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentStatus::Active => write!(f, "active"),
            DocumentStatus::Archived => write!(f, "archived"),
        }
    }
}

/// A document with its display fields.
///
/// `updated_at` doubles as the version marker and `drive_file_id` as the
/// external storage id when the summary cache key is derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: String,
    #[serde(default)]
    pub tags: Option<String>,
    pub file_type: String,
    pub drive_file_id: String,
    pub web_view_link: String,
    #[serde(default)]
    pub uploaded_by_email: Option<String>,
    pub status: DocumentStatus,
    /// Summary persisted server-side, if any. The client cache never reads it.
    #[serde(default)]
    pub ai_summary: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
