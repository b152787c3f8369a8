use std::path::{Path, PathBuf};

use custody_core::id::TenantId;
use custody_sync::CustodyEngine;

const STORE_DIR: &str = ".custody";

/// Options shared by every subcommand.
pub struct Context {
    store: Option<PathBuf>,
    tenant: Option<String>,
}

impl Context {
    pub fn new(store: Option<PathBuf>, tenant: Option<String>) -> Self {
        Self { store, tenant }
    }

    pub fn explicit_store(&self) -> Option<&Path> {
        self.store.as_deref()
    }

    pub fn store_root(&self) -> anyhow::Result<PathBuf> {
        match &self.store {
            Some(path) => absolute(path),
            None => find_store_root(),
        }
    }

    pub fn engine(&self) -> anyhow::Result<CustodyEngine> {
        let root = self.store_root()?;
        Ok(CustodyEngine::open(&root)?)
    }

    pub fn tenant(&self) -> anyhow::Result<TenantId> {
        let raw = self
            .tenant
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("this command needs --tenant <id>"))?;
        Ok(TenantId::new(raw)?)
    }
}

pub fn absolute(path: &Path) -> anyhow::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

/// Walk up from the current directory looking for `.custody/`, then fall
/// back to the per-user data directory.
pub fn find_store_root() -> anyhow::Result<PathBuf> {
    let mut dir = std::env::current_dir()?;
    loop {
        if dir.join(STORE_DIR).is_dir() {
            return Ok(dir);
        }
        if !dir.pop() {
            break;
        }
    }
    if let Some(default) = default_store_root() {
        if default.join(STORE_DIR).is_dir() {
            return Ok(default);
        }
    }
    anyhow::bail!("not in a custody store (no .custody directory found); run `custody init` or pass --store")
}

pub fn default_store_root() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("custody"))
}
