use custody_core::types::ReasonCode;
use thiserror::Error;

/// A gate refusing an item or a state transition. Callers turn these into
/// per-item outcomes, never into hard failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    #[error("declared content hash does not match payload")]
    HashMismatch,
    #[error("evidence object is under an active legal hold")]
    LegalHoldActive,
    #[error("evidence bytes have not been uploaded")]
    PendingBytes,
    #[error("invalid item: {0}")]
    InvalidItem(String),
    #[error("evidence object not found")]
    NotFound,
    #[error("already sealed with reason {existing:?}")]
    AlreadySealed { existing: Option<String> },
    #[error("evidence object is sealed")]
    Sealed,
}

impl PolicyError {
    pub fn reason_code(&self) -> ReasonCode {
        match self {
            Self::HashMismatch => ReasonCode::HashMismatch,
            Self::LegalHoldActive => ReasonCode::LegalHoldActive,
            Self::PendingBytes => ReasonCode::PendingBytes,
            Self::InvalidItem(_) => ReasonCode::InvalidItem,
            Self::NotFound => ReasonCode::NotFound,
            Self::AlreadySealed { .. } => ReasonCode::AlreadySealed,
            Self::Sealed => ReasonCode::Sealed,
        }
    }
}
