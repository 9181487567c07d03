//! Wire types of the Arkiva REST backend.

use serde::Deserialize;

/// Reply of the summary endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SummaryResponse {
    #[serde(default)]
    pub doc_id: Option<i64>,
    /// `null` or missing is treated as an empty summary.
    #[serde(default)]
    pub ai_summary: Option<String>,
}

/// Error envelope: `{ "error": { "code": "...", "message": "..." } }`.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: String,
}
