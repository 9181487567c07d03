//! ARKIVA Test Utilities
//!
//! Centralized test infrastructure for the Arkiva workspace:
//! - Document fixtures and proptest generators
//! - A manually advanced clock for TTL scenarios
//! - A scripted summary generator whose calls the test resolves explicitly
//! - A static document source

pub use arkiva_core::{
    Clock, Document, DocumentId, DocumentStatus, Fingerprint, GenerationError, Timestamp,
};
pub use arkiva_llm::{DocumentSource, SummaryGenerator};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};
use tokio::sync::oneshot;

// ============================================================================
// FIXTURES
// ============================================================================

/// 2024-01-01 09:00:00 UTC, the epoch of every fixture.
pub fn t0() -> Timestamp {
    Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

/// A document whose version marker is [`t0`].
pub fn sample_document(id: i64) -> Document {
    Document {
        id: DocumentId::new(id),
        title: format!("Document {}", id),
        description: Some("Quarterly report".to_string()),
        category: "Reports".to_string(),
        tags: Some("finance,q1".to_string()),
        file_type: "application/pdf".to_string(),
        drive_file_id: format!("drive-{}", id),
        web_view_link: format!("https://drive.example/file/{}", id),
        uploaded_by_email: Some("staff@arkiva.example".to_string()),
        status: DocumentStatus::Active,
        ai_summary: None,
        created_at: t0(),
        updated_at: t0(),
    }
}

/// The same document after an edit `secs` seconds after [`t0`].
pub fn edited(doc: &Document, secs: i64) -> Document {
    Document {
        updated_at: t0() + chrono::Duration::seconds(secs),
        ..doc.clone()
    }
}

/// The same document after its file was replaced in external storage.
pub fn replaced_file(doc: &Document, storage_id: &str) -> Document {
    Document {
        drive_file_id: storage_id.to_string(),
        ..doc.clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// ============================================================================
// MANUAL CLOCK
// ============================================================================

/// Clock that only moves when the test says so.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Timestamp>,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Starts at [`t0`].
    pub fn at_t0() -> Self {
        Self::new(t0())
    }

    pub fn advance(&self, by: std::time::Duration) {
        let mut now = lock(&self.now);
        if let Ok(delta) = chrono::Duration::from_std(by) {
            *now += delta;
        }
    }

    pub fn set(&self, to: Timestamp) {
        *lock(&self.now) = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *lock(&self.now)
    }
}

// ============================================================================
// SCRIPTED GENERATOR
// ============================================================================

type Outcome = Result<String, GenerationError>;

/// Summary generator whose calls stay pending until the test resolves them.
///
/// Calls are answered in arrival order per document.
#[derive(Debug, Default)]
pub struct ScriptedGenerator {
    pending: Mutex<HashMap<DocumentId, VecDeque<oneshot::Sender<Outcome>>>>,
    calls: Mutex<HashMap<DocumentId, usize>>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls received for a document.
    pub fn calls(&self, document_id: DocumentId) -> usize {
        lock(&self.calls).get(&document_id).copied().unwrap_or(0)
    }

    /// Calls received across all documents.
    pub fn total_calls(&self) -> usize {
        lock(&self.calls).values().sum()
    }

    /// Calls for a document that have not been resolved yet.
    pub fn pending(&self, document_id: DocumentId) -> usize {
        lock(&self.pending)
            .get(&document_id)
            .map(VecDeque::len)
            .unwrap_or(0)
    }

    /// Resolve the oldest pending call for `document_id`, if there is one.
    pub fn try_resolve(&self, document_id: DocumentId, outcome: Outcome) -> bool {
        let sender = lock(&self.pending)
            .get_mut(&document_id)
            .and_then(VecDeque::pop_front);
        match sender {
            Some(sender) => {
                let _ = sender.send(outcome);
                true
            }
            None => false,
        }
    }

    /// Resolve the oldest pending call for `document_id`, yielding to the
    /// runtime until the spawned call has actually reached the generator.
    ///
    /// # Panics
    /// If no call arrives after a bounded number of yields.
    pub async fn resolve(&self, document_id: DocumentId, outcome: Outcome) {
        let mut outcome = Some(outcome);
        for _ in 0..1_000 {
            if self.pending(document_id) > 0 {
                if let Some(outcome) = outcome.take() {
                    self.try_resolve(document_id, outcome);
                }
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("no pending summary call for document {}", document_id);
    }
}

#[async_trait]
impl SummaryGenerator for ScriptedGenerator {
    async fn generate_summary(&self, document_id: DocumentId) -> Result<String, GenerationError> {
        let (sender, receiver) = oneshot::channel();
        {
            let mut pending = lock(&self.pending);
            pending.entry(document_id).or_default().push_back(sender);
            *lock(&self.calls).entry(document_id).or_insert(0) += 1;
        }
        receiver
            .await
            .unwrap_or_else(|_| Err(GenerationError::network("scripted call dropped")))
    }
}

// ============================================================================
// STATIC DOCUMENT SOURCE
// ============================================================================

/// Document source backed by a fixed map.
#[derive(Debug, Default)]
pub struct StaticDocumentSource {
    documents: Mutex<HashMap<DocumentId, Document>>,
    failure: Mutex<Option<GenerationError>>,
}

impl StaticDocumentSource {
    pub fn new(documents: impl IntoIterator<Item = Document>) -> Self {
        Self {
            documents: Mutex::new(documents.into_iter().map(|d| (d.id, d)).collect()),
            failure: Mutex::new(None),
        }
    }

    /// Replace (or add) a document, e.g. after an edit.
    pub fn put(&self, document: Document) {
        lock(&self.documents).insert(document.id, document);
    }

    /// Make every subsequent fetch fail with `error`.
    pub fn fail_with(&self, error: GenerationError) {
        *lock(&self.failure) = Some(error);
    }
}

#[async_trait]
impl DocumentSource for StaticDocumentSource {
    async fn fetch_document(&self, document_id: DocumentId) -> Result<Document, GenerationError> {
        if let Some(error) = lock(&self.failure).clone() {
            return Err(error);
        }
        lock(&self.documents)
            .get(&document_id)
            .cloned()
            .ok_or(GenerationError::NotFound { document_id })
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    use super::*;
    use proptest::prelude::*;

    pub fn arb_document_id() -> impl Strategy<Value = DocumentId> {
        (1i64..10_000).prop_map(DocumentId::new)
    }

    /// Documents that differ in id, version marker and storage id.
    pub fn arb_document() -> impl Strategy<Value = Document> {
        (arb_document_id(), 0i64..1_000_000, "[a-zA-Z0-9]{4,12}").prop_map(
            |(id, secs, storage)| Document {
                id,
                updated_at: t0() + chrono::Duration::seconds(secs),
                drive_file_id: storage,
                ..sample_document(id.get())
            },
        )
    }

    /// Summary texts, including multi-byte characters.
    pub fn arb_summary() -> impl Strategy<Value = String> {
        prop_oneof![
            "[a-zA-Z .,]{1,80}",
            "[ëçÇË a-z]{1,40}",
            Just("Përmbledhje 📄 e shkurtër".to_string()),
        ]
    }
}
