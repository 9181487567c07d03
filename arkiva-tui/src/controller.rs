//! Per-panel presentation of a document and its summary.

use crate::coordinator::{Admission, Epoch, RequestCoordinator, Subscription};
use crate::events::SummaryEvent;
use crate::host::PanelId;
use crate::reveal::{RevealScheduler, RevealState, RevealTiming, TimerToken};
use arkiva_core::{
    Clock, Document, DocumentId, Fingerprint, GenerationError, DOCUMENT_FETCH_FAILED_MESSAGE,
    QUOTA_EXCEEDED_MESSAGE,
};
use arkiva_llm::DocumentSource;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// What the panel knows about its document.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentSlot {
    Empty,
    Loading(DocumentId),
    Loaded(Box<Document>),
    Failed {
        document_id: DocumentId,
        message: String,
    },
}

/// Everything the view needs to draw the summary area.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PanelSnapshot {
    pub visible_text: String,
    pub is_loading: bool,
    pub placeholder_frame: Option<&'static str>,
    pub error_message: Option<String>,
    pub expanded: bool,
    pub can_expand: bool,
}

/// Entry point the view calls when a document panel opens or closes.
///
/// Every open and close bumps the epoch. Results carrying an older epoch
/// are discarded on arrival.
pub struct PresentationController {
    panel: PanelId,
    epoch: Epoch,
    coordinator: Rc<RefCell<RequestCoordinator>>,
    source: Arc<dyn DocumentSource>,
    clock: Arc<dyn Clock>,
    events: mpsc::Sender<SummaryEvent>,
    scheduler: RevealScheduler,
    document: DocumentSlot,
    fingerprint: Option<Fingerprint>,
    expanded: bool,
    snapshot: PanelSnapshot,
}

impl PresentationController {
    pub fn new(
        panel: PanelId,
        coordinator: Rc<RefCell<RequestCoordinator>>,
        source: Arc<dyn DocumentSource>,
        clock: Arc<dyn Clock>,
        timing: RevealTiming,
        events: mpsc::Sender<SummaryEvent>,
    ) -> Self {
        Self {
            panel,
            epoch: 0,
            coordinator,
            source,
            clock,
            scheduler: RevealScheduler::new(panel, timing, events.clone()),
            events,
            document: DocumentSlot::Empty,
            fingerprint: None,
            expanded: false,
            snapshot: PanelSnapshot::default(),
        }
    }

    /// Show `doc` and its summary.
    ///
    /// Opening the version already on display is a no-op unless it failed.
    pub fn open(&mut self, doc: Document) {
        let fingerprint = Fingerprint::of(&doc);
        let failed = matches!(self.scheduler.state(), RevealState::Failed { .. });
        if self.fingerprint.as_ref() == Some(&fingerprint) && !failed {
            debug!(panel = %self.panel, %fingerprint, "document already shown");
            return;
        }

        self.begin();
        self.show(doc);
    }

    /// Fetch document `id` and then show it as [`Self::open`] would.
    pub fn open_document(&mut self, id: DocumentId) {
        self.begin();
        self.document = DocumentSlot::Loading(id);

        let source = Arc::clone(&self.source);
        let events = self.events.clone();
        let panel = self.panel;
        let epoch = self.epoch;
        tokio::spawn(async move {
            let fetch = tokio::spawn(async move { source.fetch_document(id).await });
            let result = match fetch.await {
                Ok(result) => result,
                Err(error) => {
                    warn!(document_id = %id, %error, "document fetch task died");
                    Err(GenerationError::interrupted(error.to_string()))
                }
            };
            if events
                .send(SummaryEvent::DocumentLoaded {
                    panel,
                    epoch,
                    result,
                })
                .await
                .is_err()
            {
                debug!(document_id = %id, "event loop gone, dropping fetched document");
            }
        });
        self.refresh_snapshot();
    }

    pub fn close(&mut self) {
        self.begin();
        self.refresh_snapshot();
    }

    /// Flip between the collapsed and full summary. Returns whether it flipped.
    pub fn toggle_expanded(&mut self) -> bool {
        if !self.snapshot.can_expand {
            return false;
        }
        self.expanded = !self.expanded;
        self.refresh_snapshot();
        true
    }

    pub fn on_tick(&mut self, token: TimerToken) -> bool {
        let changed = self.scheduler.on_tick(token);
        if changed {
            self.refresh_snapshot();
        }
        changed
    }

    /// Consume a generation outcome addressed to this panel at `epoch`.
    pub fn on_generated(
        &mut self,
        epoch: Epoch,
        outcome: &Result<String, GenerationError>,
    ) -> bool {
        if epoch != self.epoch {
            debug!(
                panel = %self.panel,
                result_epoch = epoch,
                current_epoch = self.epoch,
                "discarding stale summary result"
            );
            return false;
        }

        match outcome {
            Ok(summary) => self.scheduler.reveal(summary.as_str()),
            Err(error) => self.scheduler.fail(error.user_message()),
        }
        self.refresh_snapshot();
        true
    }

    pub fn on_document_loaded(
        &mut self,
        epoch: Epoch,
        result: Result<Document, GenerationError>,
    ) -> bool {
        if epoch != self.epoch {
            debug!(panel = %self.panel, result_epoch = epoch, "discarding stale document");
            return false;
        }

        match result {
            Ok(doc) => self.show(doc),
            Err(error) => {
                let document_id = match &self.document {
                    DocumentSlot::Loading(id) => *id,
                    _ => return false,
                };
                let message = match error {
                    GenerationError::NotFound { .. } => error.user_message(),
                    _ => DOCUMENT_FETCH_FAILED_MESSAGE.to_string(),
                };
                self.document = DocumentSlot::Failed {
                    document_id,
                    message,
                };
                self.refresh_snapshot();
            }
        }
        true
    }

    pub fn panel(&self) -> PanelId {
        self.panel
    }

    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    pub fn document(&self) -> &DocumentSlot {
        &self.document
    }

    pub fn fingerprint(&self) -> Option<&Fingerprint> {
        self.fingerprint.as_ref()
    }

    pub fn reveal_state(&self) -> &RevealState {
        self.scheduler.state()
    }

    pub fn snapshot(&self) -> &PanelSnapshot {
        &self.snapshot
    }

    /// Invalidate everything in flight for this panel and clear the display.
    fn begin(&mut self) {
        self.epoch += 1;
        self.scheduler.reset();
        self.document = DocumentSlot::Empty;
        self.fingerprint = None;
        self.expanded = false;
    }

    fn show(&mut self, doc: Document) {
        let subscriber = Subscription {
            panel: self.panel,
            epoch: self.epoch,
        };
        let admission = self
            .coordinator
            .borrow_mut()
            .admit(&doc, subscriber, self.clock.now());

        match admission {
            Admission::Ready(summary) => self.scheduler.reveal(summary),
            Admission::Joined(_) | Admission::Dispatched(_) => self.scheduler.show_placeholder(),
            Admission::QuotaExceeded => self.scheduler.fail(QUOTA_EXCEEDED_MESSAGE),
        }

        self.fingerprint = Some(Fingerprint::of(&doc));
        self.document = DocumentSlot::Loaded(Box::new(doc));
        self.refresh_snapshot();
    }

    fn refresh_snapshot(&mut self) {
        let state = self.scheduler.state();
        let can_expand = matches!(state, RevealState::Done) && !self.scheduler.text().is_empty();
        self.snapshot = PanelSnapshot {
            visible_text: self.scheduler.visible_text().to_string(),
            is_loading: matches!(state, RevealState::Placeholder { .. }),
            placeholder_frame: self.scheduler.placeholder_frame(),
            error_message: match state {
                RevealState::Failed { message } => Some(message.clone()),
                _ => None,
            },
            expanded: self.expanded && can_expand,
            can_expand,
        };
    }
}
