use serde::{Deserialize, Serialize};

use crate::id::{EventId, EvidenceObjectId, TenantId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainStatus {
    Open,
    Sealed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceObject {
    pub id: EvidenceObjectId,
    pub tenant_id: TenantId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub individual_id: Option<String>,
    pub client_request_id: String,
    pub local_id: String,
    pub device_id: String,
    pub source_type: String,
    pub title: String,
    /// Canonical SHA-256 of the payload as computed at ingest.
    pub content_sha256: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_mime: Option<String>,
    pub pending_bytes: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_key: Option<String>,
    #[serde(default)]
    pub metadata: serde_json::Value,
    pub chain_status: ChainStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seal_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sealed_at_ms: Option<u64>,
    pub created_at_ms: u64,
    pub updated_at_ms: u64,
}

impl EvidenceObject {
    pub fn is_sealed(&self) -> bool {
        self.chain_status == ChainStatus::Sealed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Ingested,
    BytesAttached,
    Sealed,
}

/// Provenance history for an evidence object. Insert-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceEvent {
    pub id: EventId,
    pub evidence_object_id: EvidenceObjectId,
    pub kind: EventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_client_request_id: Option<String>,
    #[serde(default)]
    pub detail: serde_json::Value,
    pub created_at_ms: u64,
}
