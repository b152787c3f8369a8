use std::path::{Path, PathBuf};

use crate::StoreError;

#[derive(Debug, Clone)]
pub struct StoreLayout {
    root: PathBuf,
}

impl StoreLayout {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn custody_dir(&self) -> PathBuf {
        self.root.join(".custody")
    }

    pub fn config_file(&self) -> PathBuf {
        self.custody_dir().join("custody.toml")
    }

    pub fn db_file(&self) -> PathBuf {
        self.custody_dir().join("custody.redb")
    }

    pub fn create_dirs(&self) -> Result<(), StoreError> {
        std::fs::create_dir_all(self.custody_dir())?;
        Ok(())
    }
}
