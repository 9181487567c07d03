use arkiva_cache::GenerationPolicy;
use arkiva_core::{DocumentId, Fingerprint, GenerationError, QUOTA_EXCEEDED_MESSAGE};
use arkiva_test_utils::{
    edited, sample_document, ManualClock, ScriptedGenerator, StaticDocumentSource,
};
use arkiva_tui::{DocumentSlot, PanelHost, PanelId, PanelSnapshot, RevealState, RevealTiming};
use std::sync::Arc;
use std::time::Duration;

const TTL: Duration = Duration::from_secs(10 * 60);

struct Session {
    host: PanelHost,
    generator: Arc<ScriptedGenerator>,
    source: Arc<StaticDocumentSource>,
    clock: Arc<ManualClock>,
}

fn session(policy: GenerationPolicy) -> Session {
    let generator = Arc::new(ScriptedGenerator::new());
    let source = Arc::new(StaticDocumentSource::new([
        sample_document(1),
        sample_document(2),
    ]));
    let clock = Arc::new(ManualClock::at_t0());
    let host = PanelHost::new(
        policy,
        RevealTiming::default(),
        generator.clone(),
        source.clone(),
        clock.clone(),
    );
    Session {
        host,
        generator,
        source,
        clock,
    }
}

async fn pump_until(host: &mut PanelHost, done: impl Fn(&PanelHost) -> bool) {
    for _ in 0..100_000 {
        if done(host) {
            return;
        }
        let event = host.next_event().await.expect("event channel closed");
        host.handle_event(event);
    }
    panic!("condition not reached");
}

fn state(host: &PanelHost, panel: PanelId) -> RevealState {
    host.panel(panel)
        .map(|p| p.reveal_state().clone())
        .unwrap_or(RevealState::Idle)
}

fn snapshot(host: &PanelHost, panel: PanelId) -> PanelSnapshot {
    host.panel(panel)
        .map(|p| p.snapshot().clone())
        .unwrap_or_default()
}

fn is_done(panel: PanelId) -> impl Fn(&PanelHost) -> bool {
    move |host| state(host, panel) == RevealState::Done
}

#[tokio::test(start_paused = true)]
async fn ttl_and_quota_scenario() {
    let mut s = session(GenerationPolicy::new().with_ttl(TTL).with_max_generations(2));
    let panel = s.host.add_panel();
    let doc = sample_document(1);
    let fp = Fingerprint::of(&doc);

    // Miss, dispatch, S1 stored with count 1.
    s.host.open(panel, doc.clone());
    assert!(snapshot(&s.host, panel).is_loading);
    s.generator.resolve(doc.id, Ok("S1".to_string())).await;
    pump_until(&mut s.host, is_done(panel)).await;
    assert_eq!(snapshot(&s.host, panel).visible_text, "S1");
    assert_eq!(s.host.coordinator().store().generation_count(&fp), 1);

    // Reopen within the TTL: hit, no dispatch, still animated.
    s.host.close(panel);
    s.host.open(panel, doc.clone());
    assert_eq!(state(&s.host, panel), RevealState::Revealing { prefix_len: 0 });
    pump_until(&mut s.host, is_done(panel)).await;
    assert_eq!(snapshot(&s.host, panel).visible_text, "S1");
    assert_eq!(s.generator.calls(doc.id), 1);
    assert_eq!(s.host.coordinator().store().generation_count(&fp), 1);

    // Past the TTL: miss, dispatch, count 2.
    s.clock.advance(TTL + Duration::from_secs(1));
    s.host.close(panel);
    s.host.open(panel, doc.clone());
    assert!(snapshot(&s.host, panel).is_loading);
    s.generator.resolve(doc.id, Ok("S2".to_string())).await;
    pump_until(&mut s.host, is_done(panel)).await;
    assert_eq!(snapshot(&s.host, panel).visible_text, "S2");
    assert_eq!(s.host.coordinator().store().generation_count(&fp), 2);

    // Past the TTL again: quota exceeded, no dispatch, error shown.
    s.clock.advance(TTL + Duration::from_secs(1));
    s.host.close(panel);
    s.host.open(panel, doc.clone());
    let snap = snapshot(&s.host, panel);
    assert_eq!(snap.error_message.as_deref(), Some(QUOTA_EXCEEDED_MESSAGE));
    assert!(snap.visible_text.is_empty());
    assert!(!snap.is_loading);
    assert_eq!(s.generator.calls(doc.id), 2);
    assert_eq!(s.host.coordinator().in_flight_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn switching_documents_discards_stale_result() {
    let mut s = session(GenerationPolicy::default());
    let panel = s.host.add_panel();
    let a = sample_document(1);
    let b = sample_document(2);
    let fp_a = Fingerprint::of(&a);
    let fp_b = Fingerprint::of(&b);

    s.host.open(panel, a.clone());
    s.host.close(panel);
    s.host.open(panel, b.clone());

    s.generator.resolve(a.id, Ok("SA".to_string())).await;
    pump_until(&mut s.host, |h| !h.coordinator().is_in_flight(&fp_a)).await;

    // B is unaffected, A's entry was still stored.
    let panel_ref = s.host.panel(panel).expect("panel exists");
    assert_eq!(panel_ref.fingerprint(), Some(&fp_b));
    assert!(panel_ref.snapshot().is_loading);
    assert!(panel_ref.snapshot().visible_text.is_empty());
    assert_eq!(
        s.host
            .coordinator()
            .store()
            .peek(&fp_a)
            .map(|e| e.summary.clone()),
        Some("SA".to_string())
    );

    s.generator.resolve(b.id, Ok("SB".to_string())).await;
    pump_until(&mut s.host, is_done(panel)).await;
    assert_eq!(snapshot(&s.host, panel).visible_text, "SB");
}

#[tokio::test(start_paused = true)]
async fn concurrent_opens_share_one_generation() {
    let mut s = session(GenerationPolicy::default());
    let left = s.host.add_panel();
    let right = s.host.add_panel();
    let doc = sample_document(1);

    s.host.open(left, doc.clone());
    s.host.open(right, doc.clone());
    assert_eq!(s.host.coordinator().in_flight_count(), 1);

    s.generator.resolve(doc.id, Ok("shared".to_string())).await;
    pump_until(&mut s.host, |h| is_done(left)(h) && is_done(right)(h)).await;

    assert_eq!(snapshot(&s.host, left).visible_text, "shared");
    assert_eq!(snapshot(&s.host, right).visible_text, "shared");
    assert_eq!(s.generator.calls(doc.id), 1);
    assert_eq!(
        s.host
            .coordinator()
            .store()
            .generation_count(&Fingerprint::of(&doc)),
        1
    );
}

#[tokio::test(start_paused = true)]
async fn reopening_while_pending_is_idempotent() {
    let mut s = session(GenerationPolicy::default());
    let panel = s.host.add_panel();
    let doc = sample_document(1);

    s.host.open(panel, doc.clone());
    let epoch = s.host.panel(panel).map(|p| p.epoch());
    s.host.open(panel, doc.clone());
    assert_eq!(s.host.panel(panel).map(|p| p.epoch()), epoch);

    s.generator.resolve(doc.id, Ok("once".to_string())).await;
    pump_until(&mut s.host, is_done(panel)).await;
    assert_eq!(s.generator.calls(doc.id), 1);
    assert_eq!(s.generator.pending(doc.id), 0);
}

#[tokio::test(start_paused = true)]
async fn edited_document_is_regenerated() {
    let mut s = session(GenerationPolicy::default());
    let panel = s.host.add_panel();
    let doc = sample_document(1);

    s.host.open(panel, doc.clone());
    s.generator.resolve(doc.id, Ok("v1".to_string())).await;
    pump_until(&mut s.host, is_done(panel)).await;

    s.host.open(panel, edited(&doc, 60));
    assert!(snapshot(&s.host, panel).is_loading);
    s.generator.resolve(doc.id, Ok("v2".to_string())).await;
    pump_until(&mut s.host, is_done(panel)).await;

    assert_eq!(snapshot(&s.host, panel).visible_text, "v2");
    assert_eq!(s.generator.calls(doc.id), 2);
}

#[tokio::test(start_paused = true)]
async fn failure_surfaces_message_and_reopen_retries() {
    let mut s = session(GenerationPolicy::default());
    let panel = s.host.add_panel();
    let doc = sample_document(1);
    let fp = Fingerprint::of(&doc);

    s.host.open(panel, doc.clone());
    s.generator
        .resolve(
            doc.id,
            Err(GenerationError::backend(500, "AI summary generation failed")),
        )
        .await;
    pump_until(&mut s.host, |h| {
        snapshot(h, panel).error_message.is_some()
    })
    .await;
    assert_eq!(
        snapshot(&s.host, panel).error_message.as_deref(),
        Some("AI summary generation failed")
    );
    assert_eq!(s.host.coordinator().store().generation_count(&fp), 1);

    s.host.open(panel, doc.clone());
    assert!(snapshot(&s.host, panel).is_loading);
    assert_eq!(s.host.coordinator().store().generation_count(&fp), 2);

    s.generator.resolve(doc.id, Ok("recovered".to_string())).await;
    pump_until(&mut s.host, is_done(panel)).await;
    assert_eq!(snapshot(&s.host, panel).visible_text, "recovered");
}

#[tokio::test(start_paused = true)]
async fn reveal_prefix_grows_one_char_per_tick() {
    let mut s = session(GenerationPolicy::default());
    let panel = s.host.add_panel();
    let doc = sample_document(1);
    let summary = "Përmbledhje 📄";

    s.host.open(panel, doc.clone());
    s.generator.resolve(doc.id, Ok(summary.to_string())).await;
    pump_until(&mut s.host, |h| {
        matches!(state(h, panel), RevealState::Revealing { .. })
    })
    .await;

    let mut lengths = Vec::new();
    while state(&s.host, panel) != RevealState::Done {
        let event = s.host.next_event().await.expect("event channel closed");
        if s.host.handle_event(event) {
            lengths.push(snapshot(&s.host, panel).visible_text.chars().count());
        }
    }

    let total = summary.chars().count();
    assert_eq!(lengths, (1..=total).collect::<Vec<_>>());
    assert_eq!(snapshot(&s.host, panel).visible_text, summary);
}

#[tokio::test(start_paused = true)]
async fn open_document_fetches_current_version() {
    let mut s = session(GenerationPolicy::default());
    let panel = s.host.add_panel();
    let id = DocumentId::new(1);

    s.host.open_document(panel, id);
    pump_until(&mut s.host, |h| {
        matches!(
            h.panel(panel).map(|p| p.document()),
            Some(DocumentSlot::Loaded(_))
        )
    })
    .await;
    s.generator.resolve(id, Ok("first".to_string())).await;
    pump_until(&mut s.host, is_done(panel)).await;

    // The document is edited on the server; fetching again yields a new version.
    s.source.put(edited(&sample_document(1), 120));
    s.host.open_document(panel, id);
    pump_until(&mut s.host, |h| snapshot(h, panel).is_loading).await;
    s.generator.resolve(id, Ok("second".to_string())).await;
    pump_until(&mut s.host, is_done(panel)).await;

    assert_eq!(snapshot(&s.host, panel).visible_text, "second");
    assert_eq!(s.generator.calls(id), 2);
}

#[tokio::test(start_paused = true)]
async fn document_fetch_failure_is_not_a_summary_error() {
    let mut s = session(GenerationPolicy::default());
    let panel = s.host.add_panel();
    s.source.fail_with(GenerationError::network("offline"));

    s.host.open_document(panel, DocumentId::new(1));
    pump_until(&mut s.host, |h| {
        matches!(
            h.panel(panel).map(|p| p.document()),
            Some(DocumentSlot::Failed { .. })
        )
    })
    .await;

    assert_eq!(snapshot(&s.host, panel), PanelSnapshot::default());
    assert_eq!(s.generator.total_calls(), 0);
}
