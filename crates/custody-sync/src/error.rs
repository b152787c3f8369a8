use thiserror::Error;

use custody_core::id::{EvidenceObjectId, HoldId};

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("invalid request: {0}")]
    Validation(String),
    #[error("legal hold not found: {0}")]
    HoldNotFound(HoldId),
    #[error("legal hold already released: {0}")]
    HoldReleased(HoldId),
    #[error("evidence object not found: {0}")]
    ObjectNotFound(EvidenceObjectId),
    #[error("store error: {0}")]
    Store(#[from] custody_store::StoreError),
    #[error("core error: {0}")]
    Core(#[from] custody_core::CoreError),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
