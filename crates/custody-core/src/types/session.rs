use serde::{Deserialize, Serialize};

use crate::id::{SyncSessionId, TenantId};

/// One row per (tenant, device). Upserted on every contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSession {
    pub id: SyncSessionId,
    pub tenant_id: TenantId,
    pub device_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub individual_id: Option<String>,
    pub app_version: String,
    pub first_contact_ms: u64,
    pub last_contact_ms: u64,
}
