pub mod error;
pub mod evaluator;
pub mod hold;
pub mod item;
pub mod pending;
pub mod seal;

pub use error::PolicyError;
pub use evaluator::{evaluate_item, ItemPlan};
pub use seal::{evaluate_seal, SealGate};
