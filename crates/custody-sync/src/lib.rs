pub mod engine;
pub mod error;
pub mod holds;
pub mod ingest;
pub mod query;
pub mod sealer;
pub mod session;
pub mod uploads;

pub use engine::CustodyEngine;
pub use error::SyncError;
