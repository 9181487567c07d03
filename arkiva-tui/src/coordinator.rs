//! Single-flight generation requests on top of the summary cache.
//!
//! The coordinator is the only writer of the [`CacheStore`]. It decides,
//! per open, whether a summary can be shown straight from the cache, whether
//! an outstanding generation can be joined, whether the quota is spent, or
//! whether a new backend call must be spawned. Completions come back
//! through the loop as [`SummaryEvent::Generated`] and are handed to
//! [`RequestCoordinator::complete`], which returns the subscribers to
//! notify. Staleness is decided by each subscriber, not here.

use crate::events::SummaryEvent;
use crate::host::PanelId;
use arkiva_cache::{CacheStats, CacheStore, GenerationPolicy};
use arkiva_core::{Document, Fingerprint, GenerationError, Timestamp};
use arkiva_llm::SummaryGenerator;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Per-panel counter, bumped on every open and close.
pub type Epoch = u64;

/// One in-flight generation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub fingerprint: Fingerprint,
    /// Epoch of the panel that dispatched it.
    pub epoch: Epoch,
}

/// A panel waiting on a generation, as of a given epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription {
    pub panel: PanelId,
    pub epoch: Epoch,
}

/// Outcome of [`RequestCoordinator::admit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// A fresh summary was cached.
    Ready(String),
    /// A generation for this fingerprint was already running.
    Joined(GenerationRequest),
    /// The fingerprint has used up its generations.
    QuotaExceeded,
    /// A new backend call was spawned.
    Dispatched(GenerationRequest),
}

#[derive(Debug)]
struct InFlight {
    request: GenerationRequest,
    waiters: Vec<Subscription>,
}

pub struct RequestCoordinator {
    store: CacheStore,
    policy: GenerationPolicy,
    generator: Arc<dyn SummaryGenerator>,
    events: mpsc::Sender<SummaryEvent>,
    in_flight: HashMap<Fingerprint, InFlight>,
}

impl RequestCoordinator {
    pub fn new(
        policy: GenerationPolicy,
        generator: Arc<dyn SummaryGenerator>,
        events: mpsc::Sender<SummaryEvent>,
    ) -> Self {
        Self::with_store(CacheStore::new(), policy, generator, events)
    }

    pub fn with_store(
        store: CacheStore,
        policy: GenerationPolicy,
        generator: Arc<dyn SummaryGenerator>,
        events: mpsc::Sender<SummaryEvent>,
    ) -> Self {
        Self {
            store,
            policy,
            generator,
            events,
            in_flight: HashMap::new(),
        }
    }

    /// Decide how `subscriber` gets a summary for `doc`.
    pub fn admit(&mut self, doc: &Document, subscriber: Subscription, now: Timestamp) -> Admission {
        let fingerprint = Fingerprint::of(doc);

        if let Some(entry) = self.store.get(&fingerprint, now) {
            if entry.has_summary() {
                debug!(%fingerprint, panel = %subscriber.panel, "summary cache hit");
                return Admission::Ready(entry.summary);
            }
        }

        if let Some(in_flight) = self.in_flight.get_mut(&fingerprint) {
            in_flight.waiters.push(subscriber);
            debug!(
                %fingerprint,
                panel = %subscriber.panel,
                waiters = in_flight.waiters.len(),
                "joined in-flight generation"
            );
            return Admission::Joined(in_flight.request.clone());
        }

        if self.store.quota_exhausted(&fingerprint, &self.policy) {
            info!(
                %fingerprint,
                count = self.store.generation_count(&fingerprint),
                "generation quota exhausted"
            );
            return Admission::QuotaExceeded;
        }

        let entry = self.store.reserve(&fingerprint, now, self.policy.ttl);
        let request = GenerationRequest {
            fingerprint: fingerprint.clone(),
            epoch: subscriber.epoch,
        };
        self.in_flight.insert(
            fingerprint.clone(),
            InFlight {
                request: request.clone(),
                waiters: vec![subscriber],
            },
        );
        info!(
            %fingerprint,
            panel = %subscriber.panel,
            count = entry.generation_count,
            "dispatching summary generation"
        );
        self.spawn_generation(request.clone());
        Admission::Dispatched(request)
    }

    /// Record the outcome of `request` and return the subscribers to notify.
    ///
    /// A successful summary is committed even if no subscriber is still
    /// interested. A failure leaves the reserved entry empty, so the credit
    /// stays consumed.
    pub fn complete(
        &mut self,
        request: &GenerationRequest,
        outcome: &Result<String, GenerationError>,
        now: Timestamp,
    ) -> Vec<Subscription> {
        let fingerprint = &request.fingerprint;
        let waiters = match self.in_flight.get(fingerprint) {
            Some(in_flight) if in_flight.request == *request => self
                .in_flight
                .remove(fingerprint)
                .map(|in_flight| in_flight.waiters)
                .unwrap_or_default(),
            _ => {
                warn!(%fingerprint, "completion for unknown generation request");
                return Vec::new();
            }
        };

        match outcome {
            Ok(summary) => {
                self.store.commit(fingerprint, summary.as_str(), now, self.policy.ttl);
                debug!(%fingerprint, waiters = waiters.len(), "committed summary");
            }
            Err(error) => {
                warn!(%fingerprint, %error, "summary generation failed");
            }
        }
        waiters
    }

    pub fn is_in_flight(&self, fingerprint: &Fingerprint) -> bool {
        self.in_flight.contains_key(fingerprint)
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    pub fn policy(&self) -> &GenerationPolicy {
        &self.policy
    }

    pub fn stats(&self) -> CacheStats {
        self.store.stats()
    }

    fn spawn_generation(&self, request: GenerationRequest) {
        let generator = Arc::clone(&self.generator);
        let events = self.events.clone();
        let document_id = request.fingerprint.document_id();
        tokio::spawn(async move {
            // The call runs in its own task so a panic still yields a result
            // and the in-flight slot is released.
            let call = tokio::spawn(async move { generator.generate_summary(document_id).await });
            let outcome = match call.await {
                Ok(outcome) => outcome,
                Err(error) => {
                    warn!(%document_id, %error, "summary generation task died");
                    Err(GenerationError::interrupted(error.to_string()))
                }
            };
            if events
                .send(SummaryEvent::Generated { request, outcome })
                .await
                .is_err()
            {
                debug!(%document_id, "event loop gone, dropping generation result");
            }
        });
    }
}
