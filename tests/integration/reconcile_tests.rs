use std::sync::Arc;
use std::thread;

use serde_json::{json, Value};

use custody_core::hash::content_sha256;
use custody_core::id::{EvidenceObjectId, TenantId};
use custody_core::types::*;
use custody_store::{CustodyStore, IngestConfig, StoreConfig};
use custody_sync::CustodyEngine;

fn make_test_engine() -> (tempfile::TempDir, CustodyEngine) {
    make_test_engine_with(StoreConfig::default())
}

fn make_test_engine_with(config: StoreConfig) -> (tempfile::TempDir, CustodyEngine) {
    let tmp = tempfile::tempdir().unwrap();
    let engine = CustodyEngine::init(tmp.path(), config).unwrap();
    (tmp, engine)
}

fn tenant(id: &str) -> TenantId {
    TenantId::new(id).unwrap()
}

fn item(crid: &str, source_type: &str, payload: Value) -> BatchItem {
    BatchItem {
        client_request_id: crid.to_string(),
        local_id: format!("local-{crid}"),
        source_type: source_type.to_string(),
        title: format!("capture {crid}"),
        created_at_device: "2026-05-04T08:00:00Z".to_string(),
        content_sha256: Some(content_sha256(&payload).unwrap()),
        content_mime: None,
        payload,
    }
}

fn note(crid: &str, text: &str) -> BatchItem {
    item(crid, "manual_note", json!({ "text": text }))
}

fn batch(id: &str, items: Vec<BatchItem>) -> IngestBatch {
    IngestBatch {
        device_id: "tablet-7".to_string(),
        batch_client_request_id: id.to_string(),
        batch_created_at: "2026-05-04T08:05:00Z".to_string(),
        app_version: Some("4.1.0".to_string()),
        items,
    }
}

fn object_id(resp: &BatchResponse, index: usize) -> EvidenceObjectId {
    resp.results[index].evidence_object_id.unwrap()
}

// === Test 1: Batch idempotency ===
#[test]
fn test_batch_replay_returns_identical_results_without_side_effects() {
    let (_tmp, engine) = make_test_engine();
    let t = tenant("county-pd");
    let b = batch("batch-1", vec![note("r-1", "arrived on scene"), note("r-2", "spoke to witness")]);

    let first = engine.ingest_batch(&t, Some("officer-12"), &b).unwrap();
    let objects_before = engine.list_evidence_objects(&t).unwrap();
    let log_before = engine.reconcile_log(&t).unwrap();

    let second = engine.ingest_batch(&t, Some("officer-12"), &b).unwrap();
    assert!(!first.from_cache);
    assert!(second.from_cache);
    assert_eq!(first.results, second.results);
    assert_eq!(engine.list_evidence_objects(&t).unwrap(), objects_before);
    assert_eq!(engine.reconcile_log(&t).unwrap(), log_before);
}

// === Test 2: Item idempotency across batches ===
#[test]
fn test_item_idempotency_across_batches_keeps_first_content() {
    let (_tmp, engine) = make_test_engine();
    let t = tenant("county-pd");
    let first = engine
        .ingest_batch(&t, None, &batch("batch-1", vec![note("r-1", "original")]))
        .unwrap();
    let second = engine
        .ingest_batch(&t, None, &batch("batch-2", vec![note("r-1", "edited offline")]))
        .unwrap();

    assert_eq!(second.results[0].status, ItemStatus::AlreadyApplied);
    assert_eq!(object_id(&first, 0), object_id(&second, 0));
    assert_eq!(engine.list_evidence_objects(&t).unwrap().len(), 1);
    let stored = engine.get_evidence_object(&t, &object_id(&first, 0)).unwrap().unwrap();
    assert_eq!(stored.metadata["payload"]["text"], "original");
    assert!(engine.reconcile_log_for_batch(&t, "batch-2").unwrap().is_empty());
}

// === Test 3: Hash mismatch ===
#[test]
fn test_hash_mismatch_writes_nothing_for_that_item() {
    let (_tmp, engine) = make_test_engine();
    let t = tenant("county-pd");
    let mut tampered = note("r-2", "tampered");
    tampered.payload = json!({ "text": "changed after hashing" });

    let resp = engine
        .ingest_batch(&t, None, &batch("batch-1", vec![note("r-1", "fine"), tampered]))
        .unwrap();
    assert_eq!(resp.results[0].status, ItemStatus::CreatedNew);
    assert_eq!(resp.results[1].status, ItemStatus::Rejected);
    assert_eq!(resp.results[1].reason, Some(ReasonCode::HashMismatch));
    assert!(engine.find_by_request(&t, "r-2").unwrap().is_none());
    assert_eq!(engine.reconcile_log(&t).unwrap().len(), 1);
}

// === Test 4: Key order does not change the canonical hash ===
#[test]
fn test_declared_hash_is_insensitive_to_key_order() {
    let (_tmp, engine) = make_test_engine();
    let t = tenant("county-pd");
    let mut reordered = item("r-1", "manual_note", json!({ "b": 2, "a": { "y": 1, "x": [1, 2] } }));
    reordered.content_sha256 = Some(
        content_sha256(&json!({ "a": { "x": [1, 2], "y": 1 }, "b": 2 }))
            .unwrap()
            .to_uppercase(),
    );
    let resp = engine.ingest_batch(&t, None, &batch("batch-1", vec![reordered])).unwrap();
    assert_eq!(resp.results[0].status, ItemStatus::CreatedNew);
}

// === Test 5: Pending bytes block sealing for any reason ===
#[test]
fn test_pending_bytes_refuse_seal_until_upload_completes() {
    let (_tmp, engine) = make_test_engine();
    let t = tenant("county-pd");
    let resp = engine
        .ingest_batch(
            &t,
            None,
            &batch(
                "batch-1",
                vec![
                    item("r-1", "file_r2", json!({ "filename": "dashcam.mp4" })),
                    item("r-2", "file_r2", json!({ "filename": "a.jpg", "storage_key": "r2/a.jpg" })),
                ],
            ),
        )
        .unwrap();
    let pending = object_id(&resp, 0);
    let landed = object_id(&resp, 1);

    assert_eq!(engine.list_pending(&t).unwrap().len(), 1);
    for reason in [None, Some("court order"), Some("case closed")] {
        let results = engine.seal_evidence_objects(&t, None, &[pending], reason).unwrap();
        assert!(!results[0].sealed);
        assert_eq!(results[0].error, Some(ReasonCode::PendingBytes));
    }
    assert!(engine.seal_evidence_objects(&t, None, &[landed], None).unwrap()[0].sealed);

    let upload = engine.complete_upload(&t, None, &pending, "r2/dashcam.mp4").unwrap();
    assert!(upload.completed);
    assert!(engine.seal_evidence_objects(&t, None, &[pending], None).unwrap()[0].sealed);
}

// === Test 6: Legal hold enforcement ===
#[test]
fn test_legal_hold_blocks_reingest_and_seal_until_released() {
    let (_tmp, engine) = make_test_engine();
    let t = tenant("county-pd");
    let resp = engine
        .ingest_batch(&t, None, &batch("batch-1", vec![note("r-1", "statement")]))
        .unwrap();
    let id = object_id(&resp, 0);
    let hold = engine.create_hold(&t, "litigation", "Doe v. County").unwrap();
    engine.add_hold_target(&t, &hold.id, &id).unwrap();

    let reingest = engine
        .ingest_batch(&t, None, &batch("batch-2", vec![note("r-1", "statement v2")]))
        .unwrap();
    assert_eq!(reingest.results[0].reason, Some(ReasonCode::LegalHoldActive));
    let seal = engine.seal_evidence_objects(&t, None, &[id], Some("closed")).unwrap();
    assert_eq!(seal[0].error, Some(ReasonCode::LegalHoldActive));

    engine.release_hold(&t, &hold.id).unwrap();
    let seal = engine.seal_evidence_objects(&t, None, &[id], Some("closed")).unwrap();
    assert!(seal[0].sealed);
    // The earlier refusal stays in the cached batch outcome.
    let replay = engine
        .ingest_batch(&t, None, &batch("batch-2", vec![note("r-1", "statement v2")]))
        .unwrap();
    assert!(replay.from_cache);
    assert_eq!(replay.results[0].reason, Some(ReasonCode::LegalHoldActive));
}

// === Test 7: Seal terminality ===
#[test]
fn test_sealed_object_never_changes() {
    let (_tmp, engine) = make_test_engine();
    let t = tenant("county-pd");
    let resp = engine
        .ingest_batch(&t, None, &batch("batch-1", vec![note("r-1", "final")]))
        .unwrap();
    let id = object_id(&resp, 0);
    engine.seal_evidence_objects(&t, Some("sgt-4"), &[id], Some("chain closed")).unwrap();
    let sealed = engine.get_evidence_object(&t, &id).unwrap().unwrap();

    let later = engine
        .ingest_batch(&t, None, &batch("batch-2", vec![note("r-1", "late edit")]))
        .unwrap();
    assert_eq!(later.results[0].status, ItemStatus::AlreadyApplied);
    let reseal = engine.seal_evidence_objects(&t, None, &[id], Some("different")).unwrap();
    assert_eq!(reseal[0].error, Some(ReasonCode::AlreadySealed));
    let upload = engine.complete_upload(&t, None, &id, "r2/late").unwrap();
    assert_eq!(upload.error, Some(ReasonCode::Sealed));

    assert_eq!(engine.get_evidence_object(&t, &id).unwrap().unwrap(), sealed);
    assert_eq!(sealed.chain_status, ChainStatus::Sealed);
    assert_eq!(sealed.seal_reason.as_deref(), Some("chain closed"));
}

// === Test 8: Reconcile log immutability ===
#[test]
fn test_reconcile_log_rejects_update_and_delete() {
    let (tmp, engine) = make_test_engine();
    let t = tenant("county-pd");
    engine
        .ingest_batch(&t, None, &batch("batch-1", vec![note("r-1", "a")]))
        .unwrap();
    let log = engine.reconcile_log(&t).unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].result, ItemStatus::CreatedNew);
    drop(engine);

    let store = CustodyStore::open(tmp.path()).unwrap();
    let mut rewritten = log[0].clone();
    rewritten.result = ItemStatus::Rejected;
    let update = store.write(&t, |w| w.attempt_update_reconcile_entry(&rewritten));
    assert!(update.unwrap_err().to_string().starts_with("IMMUTABLE"));
    let delete = store.write(&t, |w| w.attempt_delete_reconcile_entry(&log[0].id));
    assert!(delete.unwrap_err().is_immutable());
    let replace = store.write(&t, |w| w.append_reconcile_entry(&rewritten));
    assert!(replace.unwrap_err().is_immutable());

    assert_eq!(store.read(&t).unwrap().reconcile_log().unwrap(), log);
}

// === Test 9: Tenant isolation ===
#[test]
fn test_same_request_id_in_two_tenants_yields_two_objects() {
    let (_tmp, engine) = make_test_engine();
    let a = tenant("county-pd");
    let b = tenant("state-patrol");
    let ra = engine.ingest_batch(&a, None, &batch("batch-1", vec![note("r-1", "a")])).unwrap();
    let rb = engine.ingest_batch(&b, None, &batch("batch-1", vec![note("r-1", "b")])).unwrap();

    assert!(!rb.from_cache);
    assert_eq!(rb.results[0].status, ItemStatus::CreatedNew);
    assert_ne!(object_id(&ra, 0), object_id(&rb, 0));
    assert!(engine.get_evidence_object(&b, &object_id(&ra, 0)).unwrap().is_none());
    assert_eq!(engine.list_evidence_objects(&a).unwrap().len(), 1);
    assert_eq!(engine.reconcile_log(&b).unwrap().len(), 1);

    let hold = engine.create_hold(&a, "litigation", "").unwrap();
    assert!(engine.add_hold_target(&b, &hold.id, &object_id(&rb, 0)).is_err());
}

// === Test 10: Concurrent identical batches ===
#[test]
fn test_concurrent_identical_batches_create_one_object_per_item() {
    let (_tmp, engine) = make_test_engine();
    let engine = Arc::new(engine);
    let t = tenant("county-pd");
    let b = batch(
        "batch-race",
        (0..20).map(|i| note(&format!("r-{i}"), "racing")).collect(),
    );

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let engine = engine.clone();
            let t = t.clone();
            let b = b.clone();
            thread::spawn(move || engine.ingest_batch(&t, None, &b).unwrap())
        })
        .collect();
    let responses: Vec<BatchResponse> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(responses.iter().filter(|r| !r.from_cache).count(), 1);
    for resp in &responses {
        assert_eq!(resp.results, responses[0].results);
    }
    assert_eq!(engine.list_evidence_objects(&t).unwrap().len(), 20);
    assert_eq!(engine.reconcile_log(&t).unwrap().len(), 20);
}

// === Test 11: Concurrent batches sharing items ===
#[test]
fn test_concurrent_batches_sharing_items_agree_on_object() {
    let (_tmp, engine) = make_test_engine();
    let engine = Arc::new(engine);
    let t = tenant("county-pd");

    let handles: Vec<_> = (0..6)
        .map(|i| {
            let engine = engine.clone();
            let t = t.clone();
            thread::spawn(move || {
                let b = batch(&format!("batch-{i}"), vec![note("shared", &format!("device {i}"))]);
                engine.ingest_batch(&t, None, &b).unwrap()
            })
        })
        .collect();
    let responses: Vec<BatchResponse> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let created = responses
        .iter()
        .filter(|r| r.results[0].status == ItemStatus::CreatedNew)
        .count();
    assert_eq!(created, 1);
    let ids: Vec<_> = responses.iter().map(|r| object_id(r, 0)).collect();
    assert!(ids.iter().all(|id| *id == ids[0]));
}

// === Test 12: Audit of every outcome ===
#[test]
fn test_audit_all_outcomes_records_rejections() {
    let (_tmp, engine) = make_test_engine_with(StoreConfig {
        ingest: IngestConfig {
            audit_all_outcomes: true,
            ..IngestConfig::default()
        },
        ..StoreConfig::default()
    });
    let t = tenant("county-pd");
    let mut bad = note("r-2", "x");
    bad.content_sha256 = Some("00".repeat(32));
    engine
        .ingest_batch(&t, None, &batch("batch-1", vec![note("r-1", "ok"), bad]))
        .unwrap();

    let entries = engine.reconcile_log_for_batch(&t, "batch-1").unwrap();
    assert_eq!(entries.len(), 2);
    let rejected = entries.iter().find(|e| e.client_request_id == "r-2").unwrap();
    assert_eq!(rejected.result, ItemStatus::Rejected);
    assert_eq!(rejected.reason, Some(ReasonCode::HashMismatch));
    assert!(rejected.evidence_object_id.is_none());
}

// === Test 13: Sync sessions track every contact ===
#[test]
fn test_every_batch_counts_as_device_contact() {
    let (_tmp, engine) = make_test_engine();
    let t = tenant("county-pd");
    let b = batch("batch-1", vec![note("r-1", "a")]);
    engine.ingest_batch(&t, Some("officer-1"), &b).unwrap();
    let first = engine.get_sync_session(&t, "tablet-7").unwrap().unwrap();

    let mut upgraded = b.clone();
    upgraded.app_version = Some("4.2.0".to_string());
    engine.ingest_batch(&t, None, &upgraded).unwrap();
    let second = engine.get_sync_session(&t, "tablet-7").unwrap().unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(first.first_contact_ms, second.first_contact_ms);
    assert_eq!(second.app_version, "4.2.0");
    assert_eq!(second.individual_id.as_deref(), Some("officer-1"));
    assert_eq!(engine.list_sync_sessions(&t).unwrap().len(), 1);
}

// === Test 14: Provenance events ===
#[test]
fn test_events_record_custody_history() {
    let (_tmp, engine) = make_test_engine();
    let t = tenant("county-pd");
    let resp = engine
        .ingest_batch(
            &t,
            Some("officer-1"),
            &batch("batch-1", vec![item("r-1", "file_r2", json!({ "filename": "scan.pdf" }))]),
        )
        .unwrap();
    let id = object_id(&resp, 0);
    engine.complete_upload(&t, Some("uploader"), &id, "r2/scan.pdf").unwrap();
    engine.seal_evidence_objects(&t, Some("sgt-4"), &[id], Some("intake")).unwrap();

    let events = engine.evidence_events(&t, &id).unwrap();
    let kinds: Vec<EventKind> = events.iter().map(|e| e.kind).collect();
    assert_eq!(kinds, vec![EventKind::Ingested, EventKind::BytesAttached, EventKind::Sealed]);
    let actors: Vec<Option<&str>> = events.iter().map(|e| e.actor.as_deref()).collect();
    assert_eq!(actors, vec![Some("officer-1"), Some("uploader"), Some("sgt-4")]);
    assert_eq!(events[0].batch_client_request_id.as_deref(), Some("batch-1"));
}
