use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not a custody store: {0}")]
    NotACustodyStore(PathBuf),
    #[error("IMMUTABLE: {table} rows cannot be rewritten (key {key})")]
    Immutable { table: &'static str, key: String },
    #[error("duplicate key in {table}: {key}")]
    DuplicateKey { table: &'static str, key: String },
    #[error("row not found in {table}: {key}")]
    NotFound { table: &'static str, key: String },
    #[error("database error: {0}")]
    Database(#[from] redb::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("core error: {0}")]
    Core(#[from] custody_core::CoreError),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("config error: {0}")]
    Config(String),
    #[error("invariant violated: {0}")]
    Invariant(String),
}

impl StoreError {
    pub fn is_immutable(&self) -> bool {
        matches!(self, StoreError::Immutable { .. })
    }
}

macro_rules! from_redb {
    ($($err:ty),* $(,)?) => {
        $(
            impl From<$err> for StoreError {
                fn from(e: $err) -> Self {
                    StoreError::Database(e.into())
                }
            }
        )*
    };
}

from_redb!(
    redb::DatabaseError,
    redb::TransactionError,
    redb::TableError,
    redb::StorageError,
    redb::CommitError,
);
