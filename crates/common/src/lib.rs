//! Shared helpers for the gesture trainer workspace: logging setup,
//! startup environment checks and small wire types.

pub mod types;
pub mod utils;
pub mod env;
