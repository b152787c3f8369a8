use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid tenant id: {0}")]
    InvalidTenant(String),
    #[error("invalid id: {0}")]
    InvalidId(String),
    #[error("serialization error: {0}")]
    Serialization(String),
}
