//! Domain types used throughout the engine.
//!
//! This module defines:
//!
//! - the in-memory tabular `Dataset` and its typed columns
//! - column type tags and partition boundary scalars
//! - report value objects (`DriftReport`, `LeakageReport`, `SanityReport`)

pub mod dataset;
pub mod types;

pub use dataset::*;
pub use types::*;
