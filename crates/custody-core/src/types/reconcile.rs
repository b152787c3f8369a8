use serde::{Deserialize, Serialize};

use crate::id::{EvidenceObjectId, ReconcileEntryId, TenantId};
use crate::types::{ItemStatus, ReasonCode};

/// Audit row for one reconciliation decision. Never rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileLogEntry {
    pub id: ReconcileEntryId,
    pub tenant_id: TenantId,
    pub batch_client_request_id: String,
    pub client_request_id: String,
    pub device_id: String,
    pub result: ItemStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<ReasonCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence_object_id: Option<EvidenceObjectId>,
    pub created_at_ms: u64,
}
