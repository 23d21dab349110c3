//! ip_lookup library: concurrent IP geolocation and threat-reputation lookups
//!
//! This library expands IP addresses and CIDR ranges into individual targets,
//! looks each one up against several third-party HTTP APIs concurrently
//! (geolocation with ordered fallback, plus an optional threat-reputation
//! check), and exports the merged results as JSON, CSV or HTML.
//!
//! # Example
//!
//! ```no_run
//! use ip_lookup::{expand_targets, run_scan, Config, ProviderRegistry, ScanOptions};
//! use tokio_util::sync::CancellationToken;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     ipinfo_key: "my-token".to_string(),
//!     ..Default::default()
//! };
//! let registry = ProviderRegistry::standard(&config);
//! let ips = expand_targets(&["8.8.8.8", "203.0.113.0/30"]);
//!
//! let report = run_scan(
//!     &config,
//!     &registry,
//!     &ips,
//!     ScanOptions::default(),
//!     &CancellationToken::new(),
//! )
//! .await?;
//! println!("Looked up {} IPs ({} private)", report.total_ips, report.private_ips);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! [`run_scan`] needs a Tokio runtime. [`ScanWorker`] creates its own on a
//! background thread, for callers that must not block.

pub mod app;
pub mod config;
pub mod error_handling;
pub mod export;
pub mod initialization;
mod models;
pub mod orchestrator;
pub mod providers;
pub mod report;
mod run;
pub mod targets;

// Re-export public API
pub use app::{ScanHandle, ScanRequest, ScanWorker};
pub use config::{Config, LogFormat, LogLevel, Opt};
pub use error_handling::{ConfigError, ExportError, InputError, ProviderError, ScanError};
pub use export::{export_report, ExportFormat};
pub use models::{GeoOutcome, GeoRecord, LookupResult, ThreatOutcome, ThreatRecord};
pub use orchestrator::{Orchestrator, ScanOptions};
pub use providers::{GeoProvider, ProviderRegistry, ThreatProvider};
pub use run::{run_scan, ScanReport};
pub use targets::{
    expand_targets, expand_targets_detailed, expand_targets_with_limit, is_private_ip,
    prepare_targets, prepare_targets_with_limit,
};
