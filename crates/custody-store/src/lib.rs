mod append_only;
pub mod error;
pub mod layout;
pub mod repo;
pub mod scope;
mod tables;

pub use error::StoreError;
pub use repo::{IngestConfig, StoreConfig};
pub use scope::{TenantReader, TenantWriter};

use std::path::Path;

use redb::Database;

use custody_core::id::TenantId;

use crate::layout::StoreLayout;

/// On-disk evidence store: one redb database plus a toml config under
/// `<root>/.custody/`.
pub struct CustodyStore {
    layout: StoreLayout,
    db: Database,
    config: StoreConfig,
}

impl CustodyStore {
    pub fn init(root: &Path) -> Result<Self, StoreError> {
        Self::init_with_config(root, StoreConfig::default())
    }

    pub fn init_with_config(root: &Path, config: StoreConfig) -> Result<Self, StoreError> {
        let layout = StoreLayout::new(root);
        layout.create_dirs()?;
        repo::write_config(&layout, &config)?;
        Self::open_layout(layout, config)
    }

    pub fn open(root: &Path) -> Result<Self, StoreError> {
        let layout = StoreLayout::new(root);
        if !layout.custody_dir().exists() {
            return Err(StoreError::NotACustodyStore(root.to_path_buf()));
        }
        let config = repo::read_config(&layout)?;
        Self::open_layout(layout, config)
    }

    fn open_layout(layout: StoreLayout, config: StoreConfig) -> Result<Self, StoreError> {
        let db = Database::create(layout.db_file())?;
        let txn = db.begin_write()?;
        tables::create_all(&txn)?;
        txn.commit()?;
        tracing::debug!(root = %layout.root().display(), "opened custody store");
        Ok(Self { layout, db, config })
    }

    pub fn root(&self) -> &Path {
        self.layout.root()
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Snapshot read scoped to one tenant.
    pub fn read<'a>(&self, tenant: &'a TenantId) -> Result<TenantReader<'a>, StoreError> {
        let txn = self.db.begin_read()?;
        Ok(TenantReader::new(txn, tenant))
    }

    /// Run `f` inside one write transaction scoped to `tenant`. The
    /// transaction commits only if `f` returns `Ok`; writers are serialized.
    pub fn write<T, E>(
        &self,
        tenant: &TenantId,
        f: impl FnOnce(&TenantWriter<'_>) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        let txn = self.db.begin_write().map_err(StoreError::from)?;
        let result = {
            let writer = TenantWriter::new(&txn, tenant);
            f(&writer)
        };
        match result {
            Ok(value) => {
                txn.commit().map_err(StoreError::from)?;
                Ok(value)
            }
            Err(e) => {
                if let Err(abort_err) = txn.abort() {
                    tracing::warn!(error = %abort_err, "failed to abort write transaction");
                }
                Err(e)
            }
        }
    }
}
