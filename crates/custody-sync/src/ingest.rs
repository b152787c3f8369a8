use serde_json::json;

use custody_core::hash;
use custody_core::id::{EventId, EvidenceObjectId, ReconcileEntryId, TenantId};
use custody_core::types::{
    BatchItem, BatchRecord, BatchResponse, ChainStatus, EventKind, EvidenceEvent, EvidenceObject,
    IngestBatch, ItemResult, ItemStatus, ReconcileLogEntry,
};
use custody_policy::{evaluate_item, PolicyError};
use custody_store::{IngestConfig, TenantWriter};

use crate::engine::{now_ms, CustodyEngine};
use crate::session::touch_session;
use crate::SyncError;

impl CustodyEngine {
    /// Reconcile one offline batch. Replays of a known batch return the
    /// cached outcome without re-running side effects; otherwise every item
    /// is decided independently and the outcome is cached in the same
    /// transaction as the writes.
    pub fn ingest_batch(
        &self,
        tenant: &TenantId,
        individual_id: Option<&str>,
        batch: &IngestBatch,
    ) -> Result<BatchResponse, SyncError> {
        let config = self.ingest_config();
        validate_batch(config, batch)?;
        let fingerprint = hash::fingerprint(&serde_json::to_value(batch)?)?;
        let now = now_ms();

        let response = self.store().write(tenant, |w| -> Result<BatchResponse, SyncError> {
            touch_session(
                w,
                &batch.device_id,
                individual_id,
                batch.app_version.as_deref(),
                now,
            )?;

            if let Some(record) = w.batch_record(&batch.batch_client_request_id)? {
                if record.fingerprint != fingerprint {
                    tracing::warn!(
                        tenant = %tenant,
                        batch = %batch.batch_client_request_id,
                        "batch replayed with a different body; returning original outcome"
                    );
                }
                return Ok(BatchResponse {
                    results: record.results,
                    from_cache: true,
                });
            }

            let mut results = Vec::with_capacity(batch.items.len());
            for item in &batch.items {
                let result = ingest_item(w, config, batch, item, individual_id, now)?;
                if result.status == ItemStatus::CreatedNew || config.audit_all_outcomes {
                    append_log_entry(w, batch, &result, now)?;
                }
                results.push(result);
            }

            w.put_batch_record(&BatchRecord {
                batch_client_request_id: batch.batch_client_request_id.clone(),
                device_id: batch.device_id.clone(),
                fingerprint,
                results: results.clone(),
                cached_at_ms: now,
            })?;
            Ok(BatchResponse {
                results,
                from_cache: false,
            })
        })?;

        let created = count(&response, ItemStatus::CreatedNew);
        let applied = count(&response, ItemStatus::AlreadyApplied);
        let rejected = count(&response, ItemStatus::Rejected);
        tracing::info!(
            tenant = %tenant,
            batch = %batch.batch_client_request_id,
            device = %batch.device_id,
            from_cache = response.from_cache,
            created,
            applied,
            rejected,
            "batch reconciled"
        );
        Ok(response)
    }
}

fn validate_batch(config: &IngestConfig, batch: &IngestBatch) -> Result<(), SyncError> {
    if batch.device_id.trim().is_empty() {
        return Err(SyncError::Validation("device_id must not be empty".into()));
    }
    if batch.batch_client_request_id.trim().is_empty() {
        return Err(SyncError::Validation(
            "batch_client_request_id must not be empty".into(),
        ));
    }
    if let Some(limit) = config.max_batch_items {
        if batch.items.len() > limit {
            return Err(SyncError::Validation(format!(
                "batch has {} items, limit is {limit}",
                batch.items.len()
            )));
        }
    }
    Ok(())
}

fn ingest_item(
    w: &TenantWriter<'_>,
    config: &IngestConfig,
    batch: &IngestBatch,
    item: &BatchItem,
    individual_id: Option<&str>,
    now: u64,
) -> Result<ItemResult, SyncError> {
    if item.client_request_id.trim().is_empty() {
        return Ok(reject(item, PolicyError::InvalidItem("empty client_request_id".into()), None));
    }

    // Holds and identity come first: a known request is never re-evaluated
    // against its new content.
    if let Some(existing) = w.object_for_request(&item.client_request_id)? {
        if w.is_held(&existing)? {
            return Ok(reject(item, PolicyError::LegalHoldActive, Some(existing)));
        }
        tracing::debug!(request = %item.client_request_id, object = %existing, "already applied");
        return Ok(ItemResult::already_applied(item, existing));
    }

    let plan = match evaluate_item(config, item) {
        Ok(plan) => plan,
        Err(e) => return Ok(reject(item, e, None)),
    };

    let object = EvidenceObject {
        id: EvidenceObjectId::new(),
        tenant_id: w.tenant().clone(),
        individual_id: individual_id.map(str::to_string),
        client_request_id: item.client_request_id.clone(),
        local_id: item.local_id.clone(),
        device_id: batch.device_id.clone(),
        source_type: item.source_type.clone(),
        title: item.title.clone(),
        content_sha256: plan.content_sha256,
        content_mime: item.content_mime.clone(),
        pending_bytes: plan.pending_bytes,
        storage_key: plan.storage_key,
        metadata: json!({
            "payload": item.payload,
            "created_at_device": item.created_at_device,
            "batch_created_at": batch.batch_created_at,
        }),
        chain_status: ChainStatus::Open,
        seal_reason: None,
        sealed_at_ms: None,
        created_at_ms: now,
        updated_at_ms: now,
    };
    w.insert_evidence_object(&object)?;
    w.append_event(&EvidenceEvent {
        id: EventId::new(),
        evidence_object_id: object.id,
        kind: EventKind::Ingested,
        actor: individual_id.map(str::to_string),
        batch_client_request_id: Some(batch.batch_client_request_id.clone()),
        detail: json!({
            "content_sha256": object.content_sha256,
            "pending_bytes": object.pending_bytes,
        }),
        created_at_ms: now,
    })?;

    tracing::debug!(
        request = %item.client_request_id,
        object = %object.id,
        pending_bytes = object.pending_bytes,
        "evidence created"
    );
    Ok(ItemResult::created(item, object.id))
}

fn reject(item: &BatchItem, error: PolicyError, existing: Option<EvidenceObjectId>) -> ItemResult {
    let reason = error.reason_code();
    tracing::warn!(request = %item.client_request_id, %reason, %error, "item rejected");
    ItemResult::rejected(item, reason, existing)
}

fn append_log_entry(
    w: &TenantWriter<'_>,
    batch: &IngestBatch,
    result: &ItemResult,
    now: u64,
) -> Result<(), SyncError> {
    w.append_reconcile_entry(&ReconcileLogEntry {
        id: ReconcileEntryId::new(),
        tenant_id: w.tenant().clone(),
        batch_client_request_id: batch.batch_client_request_id.clone(),
        client_request_id: result.client_request_id.clone(),
        device_id: batch.device_id.clone(),
        result: result.status,
        reason: result.reason,
        evidence_object_id: result.evidence_object_id,
        created_at_ms: now,
    })?;
    Ok(())
}

fn count(response: &BatchResponse, status: ItemStatus) -> usize {
    response.results.iter().filter(|r| r.status == status).count()
}
