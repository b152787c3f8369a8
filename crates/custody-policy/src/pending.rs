use serde_json::Value;

use custody_core::types::EvidenceObject;
use custody_store::IngestConfig;

use crate::PolicyError;

/// Object-storage reference carried in the payload, if any. Only a
/// non-empty string counts.
pub fn storage_key(config: &IngestConfig, payload: &Value) -> Option<String> {
    match payload.get(&config.storage_key_field) {
        Some(Value::String(key)) if !key.is_empty() => Some(key.clone()),
        _ => None,
    }
}

/// A file-backed capture whose bytes have not landed yet.
pub fn requires_pending_bytes(config: &IngestConfig, source_type: &str, payload: &Value) -> bool {
    config.is_file_backed(source_type) && storage_key(config, payload).is_none()
}

pub fn check_bytes_present(object: &EvidenceObject) -> Result<(), PolicyError> {
    if object.pending_bytes {
        return Err(PolicyError::PendingBytes);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn file_backed_without_key_is_pending() {
        let config = IngestConfig::default();
        assert!(requires_pending_bytes(&config, "file_r2", &json!({"name": "a.pdf"})));
        assert!(requires_pending_bytes(&config, "file_r2", &json!({"storage_key": ""})));
        assert!(requires_pending_bytes(&config, "file_r2", &json!({"storage_key": 7})));
        assert!(!requires_pending_bytes(&config, "file_r2", &json!({"storage_key": "r2/a.pdf"})));
        assert!(!requires_pending_bytes(&config, "manual_note", &json!({})));
    }

    #[test]
    fn custom_key_field() {
        let config = IngestConfig {
            storage_key_field: "object_ref".to_string(),
            ..IngestConfig::default()
        };
        assert_eq!(
            storage_key(&config, &json!({"object_ref": "bucket/x"})),
            Some("bucket/x".to_string())
        );
        assert_eq!(storage_key(&config, &json!({"storage_key": "bucket/x"})), None);
    }
}
