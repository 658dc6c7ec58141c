//! Data sources that do not come from storage.

pub mod synthetic;

pub use synthetic::{SyntheticSpec, generate_synthetic};
