//! Sample & model store for the gesture trainer.

pub mod store;
pub mod types;
mod maintenance;

pub use store::{SaveMode, TrainingStore};
pub use types::*;
