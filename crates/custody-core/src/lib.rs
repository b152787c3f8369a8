pub mod error;
pub mod hash;
pub mod id;
pub mod types;

pub use error::CoreError;
pub use hash::{content_sha256, verify};
pub use id::{EventId, EvidenceObjectId, HoldId, ReconcileEntryId, SyncSessionId, TenantId};
