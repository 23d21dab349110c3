//! Error handling and provider failure statistics.
//!
//! This module provides:
//! - Error type definitions for every layer (init, provider, config, scan, export)
//! - Categorization of provider failures
//! - Thread-safe failure counters for end-of-scan reporting
//!
//! Provider failures are always recovered inside the scan; only the types in
//! [`ScanError`] abort a batch.

mod categorization;
mod stats;
mod types;

pub use categorization::{categorize_provider_error, categorize_reqwest_error};
pub use stats::{ScanStats, StatsSummary};
pub use types::{
    ConfigError, ExportError, InitializationError, InputError, ProviderError, ProviderErrorKind,
    ScanError,
};
