use custody_core::hash;
use custody_core::types::BatchItem;
use custody_store::IngestConfig;

use crate::item::{check_declared_hash, check_request_id, check_title};
use crate::pending::{requires_pending_bytes, storage_key};
use crate::PolicyError;

/// What the engine should write for an item that passed every content gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemPlan {
    pub content_sha256: String,
    pub pending_bytes: bool,
    pub storage_key: Option<String>,
}

/// Content gates for a new item. Hold and idempotency checks need storage
/// and run before this in the engine.
pub fn evaluate_item(config: &IngestConfig, item: &BatchItem) -> Result<ItemPlan, PolicyError> {
    check_request_id(item)?;
    // A tampered payload is reported as such even when other fields are off.
    check_declared_hash(item)?;
    check_title(config, item)?;

    let content_sha256 = hash::content_sha256(&item.payload)
        .map_err(|e| PolicyError::InvalidItem(e.to_string()))?;
    Ok(ItemPlan {
        content_sha256,
        pending_bytes: requires_pending_bytes(config, &item.source_type, &item.payload),
        storage_key: storage_key(config, &item.payload),
    })
}
