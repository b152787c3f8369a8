use serde::{Deserialize, Serialize};

use crate::id::{EvidenceObjectId, HoldId, TenantId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoldStatus {
    Active,
    Released,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalHold {
    pub id: HoldId,
    pub tenant_id: TenantId,
    pub hold_type: String,
    pub title: String,
    pub status: HoldStatus,
    pub created_at_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub released_at_ms: Option<u64>,
}

impl LegalHold {
    pub fn is_active(&self) -> bool {
        self.status == HoldStatus::Active
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldTarget {
    pub hold_id: HoldId,
    pub evidence_object_id: EvidenceObjectId,
    pub added_at_ms: u64,
}
