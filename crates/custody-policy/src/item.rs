use custody_core::hash;
use custody_core::types::BatchItem;
use custody_store::IngestConfig;

use crate::PolicyError;

pub fn check_request_id(item: &BatchItem) -> Result<(), PolicyError> {
    if item.client_request_id.trim().is_empty() {
        return Err(PolicyError::InvalidItem("empty client_request_id".into()));
    }
    Ok(())
}

/// An absent declaration is accepted; the engine computes the hash itself.
pub fn check_declared_hash(item: &BatchItem) -> Result<(), PolicyError> {
    match item.content_sha256.as_deref() {
        Some(declared) if !hash::verify(&item.payload, declared) => Err(PolicyError::HashMismatch),
        _ => Ok(()),
    }
}

pub fn check_title(config: &IngestConfig, item: &BatchItem) -> Result<(), PolicyError> {
    if item.title.len() > config.max_title_len {
        return Err(PolicyError::InvalidItem(format!(
            "title longer than {} bytes",
            config.max_title_len
        )));
    }
    Ok(())
}
