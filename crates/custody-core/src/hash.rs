use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::CoreError;

/// Canonical JSON: object keys sorted by byte order at every depth, no
/// insignificant whitespace. Clients hash exactly these bytes.
pub fn canonical_bytes(value: &Value) -> Result<Vec<u8>, CoreError> {
    let mut out = Vec::new();
    write_canonical(value, &mut out)?;
    Ok(out)
}

fn write_canonical(value: &Value, out: &mut Vec<u8>) -> Result<(), CoreError> {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));
            out.push(b'{');
            for (i, (key, item)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                write_scalar(&Value::String(key.clone()), out)?;
                out.push(b':');
                write_canonical(item, out)?;
            }
            out.push(b'}');
        }
        Value::Array(items) => {
            out.push(b'[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                write_canonical(item, out)?;
            }
            out.push(b']');
        }
        scalar => write_scalar(scalar, out)?,
    }
    Ok(())
}

fn write_scalar(value: &Value, out: &mut Vec<u8>) -> Result<(), CoreError> {
    serde_json::to_writer(&mut *out, value).map_err(|e| CoreError::Serialization(e.to_string()))
}

/// Lowercase hex SHA-256 of the canonical payload bytes.
pub fn content_sha256(payload: &Value) -> Result<String, CoreError> {
    let bytes = canonical_bytes(payload)?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}

/// Compare a client-declared SHA-256 against the payload. Anything that
/// cannot be decoded or hashed counts as a mismatch.
pub fn verify(payload: &Value, declared_sha256: &str) -> bool {
    let declared = match hex::decode(declared_sha256) {
        Ok(bytes) if bytes.len() == 32 => bytes,
        _ => return false,
    };
    match canonical_bytes(payload) {
        Ok(bytes) => Sha256::digest(&bytes).as_slice() == declared.as_slice(),
        Err(_) => false,
    }
}

/// Domain-separated BLAKE3 digest of a serializable request, used to notice
/// when an idempotency key is replayed with a different body.
pub fn fingerprint(value: &Value) -> Result<String, CoreError> {
    let bytes = canonical_bytes(value)?;
    let mut hasher = blake3::Hasher::new();
    hasher.update(b"custody\0batch\0");
    hasher.update(&bytes);
    Ok(hasher.finalize().to_hex().to_string())
}
