use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use custody_store::{CustodyStore, IngestConfig, StoreConfig};

use crate::SyncError;

/// Entry point for every ingest, seal, hold and upload operation. Each
/// mutating call runs in one store write transaction, so the engine can be
/// shared across threads behind an `Arc` without further locking.
pub struct CustodyEngine {
    store: CustodyStore,
}

impl CustodyEngine {
    pub fn new(store: CustodyStore) -> Self {
        Self { store }
    }

    pub fn open(root: &Path) -> Result<Self, SyncError> {
        Ok(Self::new(CustodyStore::open(root)?))
    }

    pub fn init(root: &Path, config: StoreConfig) -> Result<Self, SyncError> {
        Ok(Self::new(CustodyStore::init_with_config(root, config)?))
    }

    pub fn store(&self) -> &CustodyStore {
        &self.store
    }

    pub(crate) fn ingest_config(&self) -> &IngestConfig {
        &self.store.config().ingest
    }
}

pub(crate) fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use custody_core::id::TenantId;

    pub fn make_engine() -> (tempfile::TempDir, CustodyEngine) {
        make_engine_with(StoreConfig::default())
    }

    pub fn make_engine_with(config: StoreConfig) -> (tempfile::TempDir, CustodyEngine) {
        let tmp = tempfile::tempdir().unwrap();
        let engine = CustodyEngine::init(tmp.path(), config).unwrap();
        (tmp, engine)
    }

    pub fn tenant(id: &str) -> TenantId {
        TenantId::new(id).unwrap()
    }

    #[test]
    fn engine_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CustodyEngine>();
    }
}
