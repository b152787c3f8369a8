use custody_core::id::{EvidenceObjectId, HoldId, TenantId};
use custody_core::types::{HoldStatus, HoldTarget, LegalHold};

use crate::engine::{now_ms, CustodyEngine};
use crate::SyncError;

impl CustodyEngine {
    pub fn create_hold(
        &self,
        tenant: &TenantId,
        hold_type: &str,
        title: &str,
    ) -> Result<LegalHold, SyncError> {
        if hold_type.trim().is_empty() {
            return Err(SyncError::Validation("hold_type must not be empty".into()));
        }
        let hold = LegalHold {
            id: HoldId::new(),
            tenant_id: tenant.clone(),
            hold_type: hold_type.to_string(),
            title: title.to_string(),
            status: HoldStatus::Active,
            created_at_ms: now_ms(),
            released_at_ms: None,
        };
        self.store()
            .write(tenant, |w| w.put_hold(&hold).map_err(SyncError::from))?;
        tracing::info!(tenant = %tenant, hold = %hold.id, hold_type, "legal hold created");
        Ok(hold)
    }

    /// Place an object under a hold. Returns false if it was already targeted.
    pub fn add_hold_target(
        &self,
        tenant: &TenantId,
        hold_id: &HoldId,
        evidence_object_id: &EvidenceObjectId,
    ) -> Result<bool, SyncError> {
        let added = self.store().write(tenant, |w| -> Result<bool, SyncError> {
            let hold = w.hold(hold_id)?.ok_or(SyncError::HoldNotFound(*hold_id))?;
            if !hold.is_active() {
                return Err(SyncError::HoldReleased(*hold_id));
            }
            if w.evidence_object(evidence_object_id)?.is_none() {
                return Err(SyncError::ObjectNotFound(*evidence_object_id));
            }
            Ok(w.put_hold_target(&HoldTarget {
                hold_id: *hold_id,
                evidence_object_id: *evidence_object_id,
                added_at_ms: now_ms(),
            })?)
        })?;
        tracing::info!(tenant = %tenant, hold = %hold_id, object = %evidence_object_id, added, "hold target");
        Ok(added)
    }

    /// Release takes effect for every later check. Releasing twice returns
    /// the already-released hold unchanged.
    pub fn release_hold(&self, tenant: &TenantId, hold_id: &HoldId) -> Result<LegalHold, SyncError> {
        let now = now_ms();
        self.store().write(tenant, |w| -> Result<LegalHold, SyncError> {
            let mut hold = w.hold(hold_id)?.ok_or(SyncError::HoldNotFound(*hold_id))?;
            if hold.is_active() {
                hold.status = HoldStatus::Released;
                hold.released_at_ms = Some(now);
                w.put_hold(&hold)?;
                tracing::info!(tenant = %tenant, hold = %hold_id, "legal hold released");
            }
            Ok(hold)
        })
    }

    pub fn get_hold(&self, tenant: &TenantId, hold_id: &HoldId) -> Result<Option<LegalHold>, SyncError> {
        Ok(self.store().read(tenant)?.hold(hold_id)?)
    }

    pub fn list_holds(&self, tenant: &TenantId) -> Result<Vec<LegalHold>, SyncError> {
        Ok(self.store().read(tenant)?.holds()?)
    }

    pub fn holds_for_object(
        &self,
        tenant: &TenantId,
        evidence_object_id: &EvidenceObjectId,
    ) -> Result<Vec<LegalHold>, SyncError> {
        Ok(self.store().read(tenant)?.holds_for_object(evidence_object_id)?)
    }

    pub fn is_held(&self, tenant: &TenantId, evidence_object_id: &EvidenceObjectId) -> Result<bool, SyncError> {
        Ok(self.store().read(tenant)?.is_held(evidence_object_id)?)
    }
}
