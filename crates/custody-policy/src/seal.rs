use custody_core::types::EvidenceObject;

use crate::hold::check_not_held;
use crate::pending::check_bytes_present;
use crate::PolicyError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SealGate {
    /// All gates passed; the object may transition to sealed.
    Proceed,
    /// Already sealed with the same reason. Nothing to write.
    Unchanged,
}

/// Gates run in a fixed order: existence, prior seal, pending bytes, hold.
pub fn evaluate_seal(
    object: Option<&EvidenceObject>,
    held: bool,
    reason: Option<&str>,
) -> Result<SealGate, PolicyError> {
    let object = object.ok_or(PolicyError::NotFound)?;
    if object.is_sealed() {
        if object.seal_reason.as_deref() == reason {
            return Ok(SealGate::Unchanged);
        }
        return Err(PolicyError::AlreadySealed {
            existing: object.seal_reason.clone(),
        });
    }
    check_bytes_present(object)?;
    check_not_held(held)?;
    Ok(SealGate::Proceed)
}
