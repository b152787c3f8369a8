use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::EvidenceObjectId;

/// A batch of offline captures as submitted by a device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestBatch {
    pub device_id: String,
    pub batch_client_request_id: String,
    #[serde(default)]
    pub batch_created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_version: Option<String>,
    #[serde(default)]
    pub items: Vec<BatchItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchItem {
    pub client_request_id: String,
    #[serde(default)]
    pub local_id: String,
    pub source_type: String,
    pub title: String,
    #[serde(default)]
    pub created_at_device: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_sha256: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_mime: Option<String>,
    #[serde(default)]
    pub payload: serde_json::Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    CreatedNew,
    AlreadyApplied,
    Rejected,
}

/// Outcome codes surfaced to callers. These are values, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReasonCode {
    HashMismatch,
    LegalHoldActive,
    PendingBytes,
    InvalidItem,
    NotFound,
    AlreadySealed,
    Sealed,
}

impl ReasonCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HashMismatch => "HASH_MISMATCH",
            Self::LegalHoldActive => "LEGAL_HOLD_ACTIVE",
            Self::PendingBytes => "PENDING_BYTES",
            Self::InvalidItem => "INVALID_ITEM",
            Self::NotFound => "NOT_FOUND",
            Self::AlreadySealed => "ALREADY_SEALED",
            Self::Sealed => "SEALED",
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemResult {
    pub client_request_id: String,
    #[serde(default)]
    pub local_id: String,
    pub status: ItemStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence_object_id: Option<EvidenceObjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<ReasonCode>,
}

impl ItemResult {
    pub fn created(item: &BatchItem, id: EvidenceObjectId) -> Self {
        Self {
            client_request_id: item.client_request_id.clone(),
            local_id: item.local_id.clone(),
            status: ItemStatus::CreatedNew,
            evidence_object_id: Some(id),
            reason: None,
        }
    }

    pub fn already_applied(item: &BatchItem, id: EvidenceObjectId) -> Self {
        Self {
            client_request_id: item.client_request_id.clone(),
            local_id: item.local_id.clone(),
            status: ItemStatus::AlreadyApplied,
            evidence_object_id: Some(id),
            reason: None,
        }
    }

    pub fn rejected(item: &BatchItem, reason: ReasonCode, existing: Option<EvidenceObjectId>) -> Self {
        Self {
            client_request_id: item.client_request_id.clone(),
            local_id: item.local_id.clone(),
            status: ItemStatus::Rejected,
            evidence_object_id: existing,
            reason: Some(reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResponse {
    pub results: Vec<ItemResult>,
    pub from_cache: bool,
}

/// Cached outcome of a processed batch, keyed by (tenant, batch_client_request_id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRecord {
    pub batch_client_request_id: String,
    pub device_id: String,
    pub fingerprint: String,
    pub results: Vec<ItemResult>,
    pub cached_at_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealResult {
    pub id: EvidenceObjectId,
    pub sealed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ReasonCode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResult {
    pub id: EvidenceObjectId,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ReasonCode>,
}
