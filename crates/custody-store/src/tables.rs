//! Table definitions backed by redb.
//!
//! Every key starts with the tenant id, so a tenant-scoped handle can only
//! ever address its own key range. Values are JSON documents.

use redb::{ReadableTable, TableDefinition, WriteTransaction};
use serde::de::DeserializeOwned;

use custody_core::id::EvidenceObjectId;
use custody_core::types::{HoldTarget, LegalHold};

use crate::StoreError;

pub(crate) type PairKey = (&'static str, &'static str);
pub(crate) type TripleKey = (&'static str, &'static str, &'static str);
pub(crate) type Doc = &'static [u8];

/// (tenant, device_id) -> SyncSession
pub(crate) const SYNC_SESSIONS: TableDefinition<PairKey, Doc> =
    TableDefinition::new("sync_sessions");
/// (tenant, evidence_object_id) -> EvidenceObject
pub(crate) const EVIDENCE_OBJECTS: TableDefinition<PairKey, Doc> =
    TableDefinition::new("evidence_objects");
/// (tenant, client_request_id) -> evidence_object_id. Unique item identity.
pub(crate) const REQUEST_INDEX: TableDefinition<PairKey, &str> =
    TableDefinition::new("evidence_request_index");
/// (tenant, evidence_object_id, event_id) -> EvidenceEvent
pub(crate) const EVIDENCE_EVENTS: TableDefinition<TripleKey, Doc> =
    TableDefinition::new("evidence_events");
/// (tenant, hold_id) -> LegalHold
pub(crate) const LEGAL_HOLDS: TableDefinition<PairKey, Doc> = TableDefinition::new("legal_holds");
/// (tenant, evidence_object_id, hold_id) -> HoldTarget
pub(crate) const HOLD_TARGETS: TableDefinition<TripleKey, Doc> =
    TableDefinition::new("hold_targets");
/// (tenant, reconcile_entry_id) -> ReconcileLogEntry
pub(crate) const RECONCILE_LOG: TableDefinition<PairKey, Doc> =
    TableDefinition::new("reconcile_log");
/// (tenant, batch_client_request_id) -> BatchRecord
pub(crate) const BATCH_RESULTS: TableDefinition<PairKey, Doc> =
    TableDefinition::new("batch_results");

pub(crate) fn create_all(txn: &WriteTransaction) -> Result<(), StoreError> {
    txn.open_table(SYNC_SESSIONS)?;
    txn.open_table(EVIDENCE_OBJECTS)?;
    txn.open_table(REQUEST_INDEX)?;
    txn.open_table(EVIDENCE_EVENTS)?;
    txn.open_table(LEGAL_HOLDS)?;
    txn.open_table(HOLD_TARGETS)?;
    txn.open_table(RECONCILE_LOG)?;
    txn.open_table(BATCH_RESULTS)?;
    Ok(())
}

pub(crate) fn get_doc<T, R>(table: &T, tenant: &str, key: &str) -> Result<Option<R>, StoreError>
where
    T: ReadableTable<PairKey, Doc>,
    R: DeserializeOwned,
{
    match table.get((tenant, key))? {
        Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
        None => Ok(None),
    }
}

pub(crate) fn scan_tenant<T, R>(table: &T, tenant: &str) -> Result<Vec<R>, StoreError>
where
    T: ReadableTable<PairKey, Doc>,
    R: DeserializeOwned,
{
    let mut out = Vec::new();
    for entry in table.range((tenant, "")..)? {
        let (key, value) = entry?;
        if key.value().0 != tenant {
            break;
        }
        out.push(serde_json::from_slice(value.value())?);
    }
    Ok(out)
}

/// All rows under (tenant, parent, *).
pub(crate) fn scan_children<T, R>(table: &T, tenant: &str, parent: &str) -> Result<Vec<R>, StoreError>
where
    T: ReadableTable<TripleKey, Doc>,
    R: DeserializeOwned,
{
    let mut out = Vec::new();
    for entry in table.range((tenant, parent, "")..)? {
        let (key, value) = entry?;
        let (t, p, _) = key.value();
        if t != tenant || p != parent {
            break;
        }
        out.push(serde_json::from_slice(value.value())?);
    }
    Ok(out)
}

pub(crate) fn lookup_request<T>(
    table: &T,
    tenant: &str,
    client_request_id: &str,
) -> Result<Option<EvidenceObjectId>, StoreError>
where
    T: ReadableTable<PairKey, &'static str>,
{
    match table.get((tenant, client_request_id))? {
        Some(guard) => Ok(Some(EvidenceObjectId::from_string(guard.value())?)),
        None => Ok(None),
    }
}

/// Holds (active or released) that target the given object.
pub(crate) fn holds_targeting<T, H>(
    targets: &T,
    holds: &H,
    tenant: &str,
    object_id: &EvidenceObjectId,
) -> Result<Vec<LegalHold>, StoreError>
where
    T: ReadableTable<TripleKey, Doc>,
    H: ReadableTable<PairKey, Doc>,
{
    let object_key = object_id.to_string();
    let links: Vec<HoldTarget> = scan_children(targets, tenant, &object_key)?;
    let mut out = Vec::with_capacity(links.len());
    for link in links {
        if let Some(hold) = get_doc::<_, LegalHold>(holds, tenant, &link.hold_id.to_string())? {
            out.push(hold);
        }
    }
    Ok(out)
}
