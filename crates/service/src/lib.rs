//! Service layer for the gesture trainer.
//! - `training::TrainingStore` owns every read and write against the sample
//!   and model tables.
//! - Errors are classified so the HTTP layer can tell bad input, an
//!   unreachable database and missing models apart.

pub mod errors;
pub mod training;
#[cfg(test)]
pub mod test_support;
