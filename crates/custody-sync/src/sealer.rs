use serde_json::json;

use custody_core::id::{EventId, EvidenceObjectId, TenantId};
use custody_core::types::{ChainStatus, EventKind, EvidenceEvent, SealResult};
use custody_policy::{evaluate_seal, SealGate};
use custody_store::TenantWriter;

use crate::engine::{now_ms, CustodyEngine};
use crate::SyncError;

impl CustodyEngine {
    /// Move each object to the terminal sealed state. Ids are evaluated
    /// independently; refusals come back as per-id results.
    pub fn seal_evidence_objects(
        &self,
        tenant: &TenantId,
        individual_id: Option<&str>,
        ids: &[EvidenceObjectId],
        reason: Option<&str>,
    ) -> Result<Vec<SealResult>, SyncError> {
        let now = now_ms();
        let results = self.store().write(tenant, |w| -> Result<Vec<SealResult>, SyncError> {
            ids.iter()
                .map(|id| seal_one(w, id, individual_id, reason, now))
                .collect()
        })?;

        let sealed = results.iter().filter(|r| r.sealed).count();
        tracing::info!(
            tenant = %tenant,
            requested = ids.len(),
            sealed,
            refused = ids.len() - sealed,
            "seal request processed"
        );
        Ok(results)
    }
}

fn seal_one(
    w: &TenantWriter<'_>,
    id: &EvidenceObjectId,
    individual_id: Option<&str>,
    reason: Option<&str>,
    now: u64,
) -> Result<SealResult, SyncError> {
    let object = w.evidence_object(id)?;
    let held = match object {
        Some(_) => w.is_held(id)?,
        None => false,
    };

    match evaluate_seal(object.as_ref(), held, reason) {
        Ok(SealGate::Unchanged) => Ok(SealResult {
            id: *id,
            sealed: true,
            error: None,
        }),
        Ok(SealGate::Proceed) => {
            let mut object = object.ok_or(SyncError::ObjectNotFound(*id))?;
            object.chain_status = ChainStatus::Sealed;
            object.seal_reason = reason.map(str::to_string);
            object.sealed_at_ms = Some(now);
            object.updated_at_ms = now;
            w.update_evidence_object(&object)?;
            w.append_event(&EvidenceEvent {
                id: EventId::new(),
                evidence_object_id: *id,
                kind: EventKind::Sealed,
                actor: individual_id.map(str::to_string),
                batch_client_request_id: None,
                detail: json!({ "reason": reason }),
                created_at_ms: now,
            })?;
            tracing::debug!(object = %id, "evidence sealed");
            Ok(SealResult {
                id: *id,
                sealed: true,
                error: None,
            })
        }
        Err(e) => {
            tracing::warn!(object = %id, reason = %e.reason_code(), "seal refused");
            Ok(SealResult {
                id: *id,
                sealed: false,
                error: Some(e.reason_code()),
            })
        }
    }
}
