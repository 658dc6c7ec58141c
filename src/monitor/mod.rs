//! Distribution comparator.

pub mod drift;

pub use drift::*;
