//! Owner of the event channel, the shared coordinator and every panel.
//!
//! Timers and backend calls run as spawned tasks that only ever post a
//! [`SummaryEvent`]. The host drains those events one at a time on the
//! loop and routes each to the panel it belongs to, so all state mutation
//! happens on a single thread without locks.

use crate::controller::PresentationController;
use crate::coordinator::{Epoch, RequestCoordinator};
use crate::events::SummaryEvent;
use crate::reveal::RevealTiming;
use arkiva_cache::{CacheStats, GenerationPolicy};
use arkiva_core::{Clock, Document, DocumentId, GenerationError};
use arkiva_llm::{DocumentSource, SummaryGenerator};
use std::cell::{Ref, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{trace, warn};

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Identifies one open details panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PanelId(u64);

impl PanelId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "panel-{}", self.0)
    }
}

pub struct PanelHost {
    coordinator: Rc<RefCell<RequestCoordinator>>,
    source: Arc<dyn DocumentSource>,
    clock: Arc<dyn Clock>,
    timing: RevealTiming,
    sender: mpsc::Sender<SummaryEvent>,
    receiver: mpsc::Receiver<SummaryEvent>,
    panels: HashMap<PanelId, PresentationController>,
    next_panel: u64,
}

impl PanelHost {
    pub fn new(
        policy: GenerationPolicy,
        timing: RevealTiming,
        generator: Arc<dyn SummaryGenerator>,
        source: Arc<dyn DocumentSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        if let Err(error) = timing.validate() {
            warn!(%error, "reveal timing out of range, ticks run at the minimum period");
        }
        let (sender, receiver) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let coordinator = RequestCoordinator::new(policy, generator, sender.clone());
        Self {
            coordinator: Rc::new(RefCell::new(coordinator)),
            source,
            clock,
            timing,
            sender,
            receiver,
            panels: HashMap::new(),
            next_panel: 1,
        }
    }

    pub fn add_panel(&mut self) -> PanelId {
        let id = PanelId(self.next_panel);
        self.next_panel += 1;
        let controller = PresentationController::new(
            id,
            Rc::clone(&self.coordinator),
            Arc::clone(&self.source),
            Arc::clone(&self.clock),
            self.timing,
            self.sender.clone(),
        );
        self.panels.insert(id, controller);
        id
    }

    /// Drop a panel. Its timer stops with it; late events for it are ignored.
    pub fn remove_panel(&mut self, id: PanelId) -> bool {
        self.panels.remove(&id).is_some()
    }

    pub fn panel(&self, id: PanelId) -> Option<&PresentationController> {
        self.panels.get(&id)
    }

    pub fn panel_mut(&mut self, id: PanelId) -> Option<&mut PresentationController> {
        self.panels.get_mut(&id)
    }

    pub fn open(&mut self, id: PanelId, doc: Document) -> bool {
        self.with_panel(id, |panel| panel.open(doc))
    }

    pub fn open_document(&mut self, id: PanelId, document_id: DocumentId) -> bool {
        self.with_panel(id, |panel| panel.open_document(document_id))
    }

    pub fn close(&mut self, id: PanelId) -> bool {
        self.with_panel(id, PresentationController::close)
    }

    pub fn coordinator(&self) -> Ref<'_, RequestCoordinator> {
        self.coordinator.borrow()
    }

    pub fn stats(&self) -> CacheStats {
        self.coordinator.borrow().stats()
    }

    /// Wait for the next timer tick or backend result.
    pub async fn next_event(&mut self) -> Option<SummaryEvent> {
        self.receiver.recv().await
    }

    /// Route one event. Returns whether any panel's display changed.
    pub fn handle_event(&mut self, event: SummaryEvent) -> bool {
        match event {
            SummaryEvent::Tick { panel, token } => match self.panels.get_mut(&panel) {
                Some(controller) => controller.on_tick(token),
                None => false,
            },
            SummaryEvent::Generated { request, outcome } => {
                let now = self.clock.now();
                let subscribers = self
                    .coordinator
                    .borrow_mut()
                    .complete(&request, &outcome, now);

                let mut changed = false;
                for subscriber in subscribers {
                    match self.panels.get_mut(&subscriber.panel) {
                        Some(controller) => {
                            changed |= controller.on_generated(subscriber.epoch, &outcome);
                        }
                        None => trace!(panel = %subscriber.panel, "result for removed panel"),
                    }
                }
                changed
            }
            SummaryEvent::DocumentLoaded {
                panel,
                epoch,
                result,
            } => self.document_loaded(panel, epoch, result),
        }
    }

    fn document_loaded(
        &mut self,
        panel: PanelId,
        epoch: Epoch,
        result: Result<Document, GenerationError>,
    ) -> bool {
        match self.panels.get_mut(&panel) {
            Some(controller) => controller.on_document_loaded(epoch, result),
            None => false,
        }
    }

    fn with_panel(&mut self, id: PanelId, f: impl FnOnce(&mut PresentationController)) -> bool {
        match self.panels.get_mut(&id) {
            Some(panel) => {
                f(panel);
                true
            }
            None => false,
        }
    }
}
