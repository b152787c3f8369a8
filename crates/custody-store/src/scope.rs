use redb::{ReadTransaction, ReadableTable, WriteTransaction};

use custody_core::id::{EvidenceObjectId, HoldId, ReconcileEntryId, TenantId};
use custody_core::types::{
    BatchRecord, EvidenceEvent, EvidenceObject, HoldTarget, LegalHold, ReconcileLogEntry,
    SyncSession,
};

use crate::append_only::{append_row, refuse};
use crate::tables::*;
use crate::StoreError;

/// Read-only, tenant-scoped view over a consistent snapshot.
pub struct TenantReader<'a> {
    txn: ReadTransaction,
    tenant: &'a TenantId,
}

impl<'a> TenantReader<'a> {
    pub(crate) fn new(txn: ReadTransaction, tenant: &'a TenantId) -> Self {
        Self { txn, tenant }
    }

    pub fn tenant(&self) -> &TenantId {
        self.tenant
    }

    fn t(&self) -> &str {
        self.tenant.as_str()
    }

    pub fn sync_session(&self, device_id: &str) -> Result<Option<SyncSession>, StoreError> {
        let table = self.txn.open_table(SYNC_SESSIONS)?;
        get_doc(&table, self.t(), device_id)
    }

    pub fn sync_sessions(&self) -> Result<Vec<SyncSession>, StoreError> {
        let table = self.txn.open_table(SYNC_SESSIONS)?;
        scan_tenant(&table, self.t())
    }

    pub fn evidence_object(&self, id: &EvidenceObjectId) -> Result<Option<EvidenceObject>, StoreError> {
        let table = self.txn.open_table(EVIDENCE_OBJECTS)?;
        get_doc(&table, self.t(), &id.to_string())
    }

    pub fn evidence_objects(&self) -> Result<Vec<EvidenceObject>, StoreError> {
        let table = self.txn.open_table(EVIDENCE_OBJECTS)?;
        scan_tenant(&table, self.t())
    }

    pub fn object_for_request(&self, client_request_id: &str) -> Result<Option<EvidenceObjectId>, StoreError> {
        let table = self.txn.open_table(REQUEST_INDEX)?;
        lookup_request(&table, self.t(), client_request_id)
    }

    /// Events for one object in insertion order (event ids are ULIDs).
    pub fn events_for(&self, id: &EvidenceObjectId) -> Result<Vec<EvidenceEvent>, StoreError> {
        let table = self.txn.open_table(EVIDENCE_EVENTS)?;
        scan_children(&table, self.t(), &id.to_string())
    }

    pub fn hold(&self, id: &HoldId) -> Result<Option<LegalHold>, StoreError> {
        let table = self.txn.open_table(LEGAL_HOLDS)?;
        get_doc(&table, self.t(), &id.to_string())
    }

    pub fn holds(&self) -> Result<Vec<LegalHold>, StoreError> {
        let table = self.txn.open_table(LEGAL_HOLDS)?;
        scan_tenant(&table, self.t())
    }

    pub fn holds_for_object(&self, id: &EvidenceObjectId) -> Result<Vec<LegalHold>, StoreError> {
        let targets = self.txn.open_table(HOLD_TARGETS)?;
        let holds = self.txn.open_table(LEGAL_HOLDS)?;
        holds_targeting(&targets, &holds, self.t(), id)
    }

    pub fn is_held(&self, id: &EvidenceObjectId) -> Result<bool, StoreError> {
        Ok(self.holds_for_object(id)?.iter().any(LegalHold::is_active))
    }

    pub fn reconcile_log(&self) -> Result<Vec<ReconcileLogEntry>, StoreError> {
        let table = self.txn.open_table(RECONCILE_LOG)?;
        scan_tenant(&table, self.t())
    }

    pub fn batch_record(&self, batch_client_request_id: &str) -> Result<Option<BatchRecord>, StoreError> {
        let table = self.txn.open_table(BATCH_RESULTS)?;
        get_doc(&table, self.t(), batch_client_request_id)
    }
}

/// Tenant-scoped handle over one write transaction. Reads observe the
/// transaction's own earlier writes.
pub struct TenantWriter<'a> {
    txn: &'a WriteTransaction,
    tenant: &'a TenantId,
}

impl<'a> TenantWriter<'a> {
    pub(crate) fn new(txn: &'a WriteTransaction, tenant: &'a TenantId) -> Self {
        Self { txn, tenant }
    }

    pub fn tenant(&self) -> &TenantId {
        self.tenant
    }

    fn t(&self) -> &str {
        self.tenant.as_str()
    }

    // ------------------------
    // Sync sessions
    // ------------------------

    pub fn sync_session(&self, device_id: &str) -> Result<Option<SyncSession>, StoreError> {
        let table = self.txn.open_table(SYNC_SESSIONS)?;
        get_doc(&table, self.t(), device_id)
    }

    pub fn put_sync_session(&self, session: &SyncSession) -> Result<(), StoreError> {
        self.check_tenant(&session.tenant_id)?;
        let bytes = serde_json::to_vec(session)?;
        let mut table = self.txn.open_table(SYNC_SESSIONS)?;
        table.insert((self.t(), session.device_id.as_str()), bytes.as_slice())?;
        Ok(())
    }

    // ------------------------
    // Evidence objects
    // ------------------------

    pub fn evidence_object(&self, id: &EvidenceObjectId) -> Result<Option<EvidenceObject>, StoreError> {
        let table = self.txn.open_table(EVIDENCE_OBJECTS)?;
        get_doc(&table, self.t(), &id.to_string())
    }

    pub fn object_for_request(&self, client_request_id: &str) -> Result<Option<EvidenceObjectId>, StoreError> {
        let table = self.txn.open_table(REQUEST_INDEX)?;
        lookup_request(&table, self.t(), client_request_id)
    }

    /// Insert a new object and claim its client_request_id. The request
    /// index is unique per tenant.
    pub fn insert_evidence_object(&self, object: &EvidenceObject) -> Result<(), StoreError> {
        self.check_tenant(&object.tenant_id)?;
        let id = object.id.to_string();
        {
            let mut index = self.txn.open_table(REQUEST_INDEX)?;
            let key = (self.t(), object.client_request_id.as_str());
            if index.get(key)?.is_some() {
                return Err(StoreError::DuplicateKey {
                    table: "evidence_request_index",
                    key: object.client_request_id.clone(),
                });
            }
            index.insert(key, id.as_str())?;
        }
        let bytes = serde_json::to_vec(object)?;
        let mut table = self.txn.open_table(EVIDENCE_OBJECTS)?;
        if table.get((self.t(), id.as_str()))?.is_some() {
            return Err(StoreError::DuplicateKey {
                table: "evidence_objects",
                key: id,
            });
        }
        table.insert((self.t(), id.as_str()), bytes.as_slice())?;
        Ok(())
    }

    /// Replace an open object. Sealed objects and identity changes are refused.
    pub fn update_evidence_object(&self, object: &EvidenceObject) -> Result<(), StoreError> {
        self.check_tenant(&object.tenant_id)?;
        let id = object.id.to_string();
        let stored: EvidenceObject = self
            .evidence_object(&object.id)?
            .ok_or_else(|| StoreError::NotFound {
                table: "evidence_objects",
                key: id.clone(),
            })?;
        if stored.is_sealed() {
            return Err(refuse("evidence_objects", &id));
        }
        if stored.client_request_id != object.client_request_id {
            return Err(StoreError::Invariant(format!(
                "client_request_id of {id} cannot change"
            )));
        }
        let bytes = serde_json::to_vec(object)?;
        let mut table = self.txn.open_table(EVIDENCE_OBJECTS)?;
        table.insert((self.t(), id.as_str()), bytes.as_slice())?;
        Ok(())
    }

    pub fn append_event(&self, event: &EvidenceEvent) -> Result<(), StoreError> {
        let object_key = event.evidence_object_id.to_string();
        let event_key = event.id.to_string();
        let bytes = serde_json::to_vec(event)?;
        let mut table = self.txn.open_table(EVIDENCE_EVENTS)?;
        append_row(
            &mut table,
            "evidence_events",
            (self.t(), object_key.as_str(), event_key.as_str()),
            &event_key,
            &bytes,
        )
    }

    // ------------------------
    // Legal holds
    // ------------------------

    pub fn hold(&self, id: &HoldId) -> Result<Option<LegalHold>, StoreError> {
        let table = self.txn.open_table(LEGAL_HOLDS)?;
        get_doc(&table, self.t(), &id.to_string())
    }

    pub fn put_hold(&self, hold: &LegalHold) -> Result<(), StoreError> {
        self.check_tenant(&hold.tenant_id)?;
        let key = hold.id.to_string();
        let bytes = serde_json::to_vec(hold)?;
        let mut table = self.txn.open_table(LEGAL_HOLDS)?;
        table.insert((self.t(), key.as_str()), bytes.as_slice())?;
        Ok(())
    }

    /// Link a hold to an object. Returns false when the link already existed.
    pub fn put_hold_target(&self, target: &HoldTarget) -> Result<bool, StoreError> {
        let object_key = target.evidence_object_id.to_string();
        let hold_key = target.hold_id.to_string();
        let bytes = serde_json::to_vec(target)?;
        let mut table = self.txn.open_table(HOLD_TARGETS)?;
        let key = (self.t(), object_key.as_str(), hold_key.as_str());
        if table.get(key)?.is_some() {
            return Ok(false);
        }
        table.insert(key, bytes.as_slice())?;
        Ok(true)
    }

    pub fn holds_for_object(&self, id: &EvidenceObjectId) -> Result<Vec<LegalHold>, StoreError> {
        let targets = self.txn.open_table(HOLD_TARGETS)?;
        let holds = self.txn.open_table(LEGAL_HOLDS)?;
        holds_targeting(&targets, &holds, self.t(), id)
    }

    /// True iff an active hold targets the object, as seen by this transaction.
    pub fn is_held(&self, id: &EvidenceObjectId) -> Result<bool, StoreError> {
        Ok(self.holds_for_object(id)?.iter().any(LegalHold::is_active))
    }

    // ------------------------
    // Reconcile log
    // ------------------------

    pub fn append_reconcile_entry(&self, entry: &ReconcileLogEntry) -> Result<(), StoreError> {
        self.check_tenant(&entry.tenant_id)?;
        let key = entry.id.to_string();
        let bytes = serde_json::to_vec(entry)?;
        let mut table = self.txn.open_table(RECONCILE_LOG)?;
        append_row(&mut table, "reconcile_log", (self.t(), key.as_str()), &key, &bytes)
    }

    /// Reconcile log rows are never rewritten; this always fails.
    pub fn attempt_update_reconcile_entry(&self, entry: &ReconcileLogEntry) -> Result<(), StoreError> {
        Err(refuse("reconcile_log", &entry.id.to_string()))
    }

    /// Reconcile log rows are never removed; this always fails.
    pub fn attempt_delete_reconcile_entry(&self, id: &ReconcileEntryId) -> Result<(), StoreError> {
        Err(refuse("reconcile_log", &id.to_string()))
    }

    // ------------------------
    // Batch result cache
    // ------------------------

    pub fn batch_record(&self, batch_client_request_id: &str) -> Result<Option<BatchRecord>, StoreError> {
        let table = self.txn.open_table(BATCH_RESULTS)?;
        get_doc(&table, self.t(), batch_client_request_id)
    }

    /// Cache a batch outcome. A cached outcome is final and never replaced.
    pub fn put_batch_record(&self, record: &BatchRecord) -> Result<(), StoreError> {
        let key = record.batch_client_request_id.as_str();
        let bytes = serde_json::to_vec(record)?;
        let mut table = self.txn.open_table(BATCH_RESULTS)?;
        append_row(&mut table, "batch_results", (self.t(), key), key, &bytes)
    }

    fn check_tenant(&self, tenant: &TenantId) -> Result<(), StoreError> {
        if tenant != self.tenant {
            return Err(StoreError::Invariant(format!(
                "row for tenant {tenant} written through scope of {}",
                self.tenant
            )));
        }
        Ok(())
    }
}
