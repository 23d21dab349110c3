//! Application glue between the library and a user-facing front end.
//!
//! Provides the background scan worker the CLI polls for results.

pub mod worker;

// Re-export public API
pub use worker::{ScanHandle, ScanRequest, ScanWorker};
