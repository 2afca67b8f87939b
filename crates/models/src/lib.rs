pub mod errors;
pub mod db;
pub mod sample_type;
pub mod training_sample;
pub mod trained_model;

pub use sample_type::SampleType;

#[cfg(test)]
mod tests;
