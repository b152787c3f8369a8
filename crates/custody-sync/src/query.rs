use custody_core::id::{EvidenceObjectId, TenantId};
use custody_core::types::{EvidenceEvent, EvidenceObject, ReconcileLogEntry};

use crate::engine::CustodyEngine;
use crate::SyncError;

impl CustodyEngine {
    pub fn get_evidence_object(
        &self,
        tenant: &TenantId,
        id: &EvidenceObjectId,
    ) -> Result<Option<EvidenceObject>, SyncError> {
        Ok(self.store().read(tenant)?.evidence_object(id)?)
    }

    pub fn find_by_request(
        &self,
        tenant: &TenantId,
        client_request_id: &str,
    ) -> Result<Option<EvidenceObject>, SyncError> {
        let reader = self.store().read(tenant)?;
        match reader.object_for_request(client_request_id)? {
            Some(id) => Ok(reader.evidence_object(&id)?),
            None => Ok(None),
        }
    }

    pub fn list_evidence_objects(&self, tenant: &TenantId) -> Result<Vec<EvidenceObject>, SyncError> {
        Ok(self.store().read(tenant)?.evidence_objects()?)
    }

    pub fn evidence_events(
        &self,
        tenant: &TenantId,
        id: &EvidenceObjectId,
    ) -> Result<Vec<EvidenceEvent>, SyncError> {
        Ok(self.store().read(tenant)?.events_for(id)?)
    }

    /// Full reconcile history for a tenant, oldest first.
    pub fn reconcile_log(&self, tenant: &TenantId) -> Result<Vec<ReconcileLogEntry>, SyncError> {
        Ok(self.store().read(tenant)?.reconcile_log()?)
    }

    pub fn reconcile_log_for_batch(
        &self,
        tenant: &TenantId,
        batch_client_request_id: &str,
    ) -> Result<Vec<ReconcileLogEntry>, SyncError> {
        let entries = self.reconcile_log(tenant)?;
        Ok(entries
            .into_iter()
            .filter(|e| e.batch_client_request_id == batch_client_request_id)
            .collect())
    }
}
