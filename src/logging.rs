//! Logging setup for the `dw` binary.
//!
//! Library code only emits `tracing` events; installing a subscriber is the
//! binary's job. Events go to stderr so report output on stdout stays clean.
//! Verbosity comes from `RUST_LOG` (default `info`).

use tracing_subscriber::EnvFilter;

use crate::error::{AppError, ErrorKind};

pub fn init() -> Result<(), AppError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| AppError::new(ErrorKind::Config, format!("Failed to initialize logging: {e}")))
}
