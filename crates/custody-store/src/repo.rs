use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::layout::StoreLayout;
use crate::StoreError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub ingest: IngestConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            version: 1,
            name: None,
            ingest: IngestConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Optional upper bound on items in one batch; larger batches are refused
    /// whole. Unset by default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_batch_items: Option<usize>,
    pub max_title_len: usize,
    /// Source types whose evidence lives in object storage.
    pub file_backed_source_types: Vec<String>,
    /// Payload field that carries an object-storage reference.
    pub storage_key_field: String,
    /// Also write reconcile log rows for already-applied and rejected items.
    pub audit_all_outcomes: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_batch_items: None,
            max_title_len: 512,
            file_backed_source_types: vec!["file_r2".to_string()],
            storage_key_field: "storage_key".to_string(),
            audit_all_outcomes: false,
        }
    }
}

impl IngestConfig {
    pub fn is_file_backed(&self, source_type: &str) -> bool {
        self.file_backed_source_types
            .iter()
            .any(|t| t == source_type)
    }
}

pub fn write_config(layout: &StoreLayout, config: &StoreConfig) -> Result<(), StoreError> {
    let toml_str =
        toml::to_string_pretty(config).map_err(|e| StoreError::Config(e.to_string()))?;
    // Atomic write: temp file + rename
    let mut temp = tempfile::NamedTempFile::new_in(layout.custody_dir())?;
    temp.write_all(toml_str.as_bytes())?;
    temp.persist(layout.config_file())
        .map_err(|e| StoreError::Io(e.error))?;
    Ok(())
}

pub fn read_config(layout: &StoreLayout) -> Result<StoreConfig, StoreError> {
    let content = std::fs::read_to_string(layout.config_file())?;
    let config: StoreConfig =
        toml::from_str(&content).map_err(|e| StoreError::Config(e.to_string()))?;
    Ok(config)
}
