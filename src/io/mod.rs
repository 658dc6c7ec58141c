//! Input/output helpers.
//!
//! - CSV ingest + type inference (`ingest`)
//! - dataset CSV and report JSON exports (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
