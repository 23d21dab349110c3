//! Application initialization and resource setup.
//!
//! This module provides functions to initialize shared resources:
//! - Logger
//! - The per-scan HTTP client
//! - The scan worker's event loop

mod client;
mod logger;

pub use client::init_client;
pub use logger::init_logger_with;

use crate::error_handling::InitializationError;

/// Builds the single-threaded event loop a scan worker drives to completion.
///
/// # Errors
///
/// Returns `InitializationError::RuntimeError` if the I/O driver cannot be
/// created.
pub fn init_runtime() -> Result<tokio::runtime::Runtime, InitializationError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    Ok(runtime)
}
