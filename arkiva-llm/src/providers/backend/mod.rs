//! Arkiva REST backend provider.
//!
//! - `GET  /api/documents/{id}`            → document
//! - `POST /api/documents/{id}/ai-summary` → `{ "doc_id", "ai_summary" }`

mod client;
mod types;

pub use client::{ArkivaBackend, BackendConfig};
