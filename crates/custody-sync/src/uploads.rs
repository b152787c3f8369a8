use serde_json::json;

use custody_core::id::{EventId, EvidenceObjectId, TenantId};
use custody_core::types::{EventKind, EvidenceEvent, EvidenceObject, ReasonCode, UploadResult};
use custody_store::TenantWriter;

use crate::engine::{now_ms, CustodyEngine};
use crate::SyncError;

impl CustodyEngine {
    /// Record that an object's bytes reached object storage. Checks run in
    /// order: existence, sealed, already attached, hold.
    pub fn complete_upload(
        &self,
        tenant: &TenantId,
        individual_id: Option<&str>,
        evidence_object_id: &EvidenceObjectId,
        storage_key: &str,
    ) -> Result<UploadResult, SyncError> {
        if storage_key.trim().is_empty() {
            return Err(SyncError::Validation("storage_key must not be empty".into()));
        }
        let now = now_ms();
        let result = self.store().write(tenant, |w| -> Result<UploadResult, SyncError> {
            attach_bytes(w, individual_id, evidence_object_id, storage_key, now)
        })?;
        match result.error {
            None => tracing::info!(tenant = %tenant, object = %evidence_object_id, "upload completed"),
            Some(reason) => {
                tracing::warn!(tenant = %tenant, object = %evidence_object_id, %reason, "upload refused")
            }
        }
        Ok(result)
    }

    /// Open objects still waiting on their bytes.
    pub fn list_pending(&self, tenant: &TenantId) -> Result<Vec<EvidenceObject>, SyncError> {
        let objects = self.store().read(tenant)?.evidence_objects()?;
        Ok(objects.into_iter().filter(|o| o.pending_bytes).collect())
    }
}

fn attach_bytes(
    w: &TenantWriter<'_>,
    individual_id: Option<&str>,
    id: &EvidenceObjectId,
    storage_key: &str,
    now: u64,
) -> Result<UploadResult, SyncError> {
    let refused = |reason| UploadResult {
        id: *id,
        completed: false,
        error: Some(reason),
    };
    let Some(mut object) = w.evidence_object(id)? else {
        return Ok(refused(ReasonCode::NotFound));
    };
    if object.is_sealed() {
        return Ok(refused(ReasonCode::Sealed));
    }
    if !object.pending_bytes {
        if object.storage_key.as_deref() != Some(storage_key) {
            tracing::warn!(object = %id, "bytes already attached under a different storage key");
        }
        return Ok(UploadResult {
            id: *id,
            completed: true,
            error: None,
        });
    }
    if w.is_held(id)? {
        return Ok(refused(ReasonCode::LegalHoldActive));
    }

    object.pending_bytes = false;
    object.storage_key = Some(storage_key.to_string());
    object.updated_at_ms = now;
    w.update_evidence_object(&object)?;
    w.append_event(&EvidenceEvent {
        id: EventId::new(),
        evidence_object_id: *id,
        kind: EventKind::BytesAttached,
        actor: individual_id.map(str::to_string),
        batch_client_request_id: None,
        detail: json!({ "storage_key": storage_key }),
        created_at_ms: now,
    })?;
    Ok(UploadResult {
        id: *id,
        completed: true,
        error: None,
    })
}
