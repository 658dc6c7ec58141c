//! `drift-watch` library crate.
//!
//! The binary (`dw`) is a thin wrapper around this library so that:
//!
//! - the statistics and validation code is testable without spawning processes
//! - storage and tracking collaborators stay swappable behind traits
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod math;
pub mod monitor;
pub mod report;
pub mod storage;
pub mod tracking;
pub mod validation;
