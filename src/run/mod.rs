//! Library entry point for one scan.

use std::time::Instant;

use log::info;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::error_handling::{ScanError, StatsSummary};
use crate::models::{GeoOutcome, LookupResult};
use crate::orchestrator::{Orchestrator, ScanOptions};
use crate::providers::ProviderRegistry;

/// Results of a scan.
///
/// Contains the per-IP results in input order plus summary statistics.
#[derive(Debug, Clone)]
pub struct ScanReport {
    /// One entry per input IP, in input order
    pub results: Vec<LookupResult>,
    /// Number of IPs scanned
    pub total_ips: usize,
    /// IPs short-circuited as private or reserved
    pub private_ips: usize,
    /// IPs for which some geolocation provider answered
    pub geolocated: usize,
    /// Swallowed provider failures
    pub stats: StatsSummary,
    /// Elapsed time in seconds
    pub elapsed_seconds: f64,
}

/// Runs lookups for `ips` and collects a [`ScanReport`].
///
/// `ips` should already be expanded (see [`crate::expand_targets`]). The
/// providers named by `config` are resolved from `registry` before any
/// request is sent.
///
/// # Errors
///
/// - `ScanError::Config` if the fallback order or threat provider cannot be
///   resolved
/// - `ScanError::Initialization` if the HTTP client cannot be built
/// - `ScanError::Cancelled` if `cancel` fires before the batch completes
///
/// # Example
///
/// ```no_run
/// use ip_lookup::{run_scan, Config, ProviderRegistry, ScanOptions};
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config::default();
/// let registry = ProviderRegistry::standard(&config);
/// let ips = vec!["8.8.8.8".to_string()];
/// let report = run_scan(
///     &config,
///     &registry,
///     &ips,
///     ScanOptions::default(),
///     &CancellationToken::new(),
/// )
/// .await?;
/// println!("Scanned {} IPs", report.total_ips);
/// # Ok(())
/// # }
/// ```
pub async fn run_scan(
    config: &Config,
    registry: &ProviderRegistry,
    ips: &[String],
    options: ScanOptions,
    cancel: &CancellationToken,
) -> Result<ScanReport, ScanError> {
    let orchestrator = Orchestrator::new(config, registry, options)?;

    info!(
        "Starting scan of {} IP{} (geolocation: {}; threat intel: {})",
        ips.len(),
        if ips.len() == 1 { "" } else { "s" },
        config.geo_fallback_order.join(" -> "),
        if options.no_threat {
            "disabled"
        } else {
            config.threat_provider.as_str()
        }
    );

    let start_time = Instant::now();
    let results = orchestrator.run_until_cancelled(ips, cancel).await?;
    let elapsed_seconds = start_time.elapsed().as_secs_f64();

    let private_ips = results
        .iter()
        .filter(|r| matches!(r, LookupResult::Failed { .. }))
        .count();
    let geolocated = results
        .iter()
        .filter(|r| matches!(r.geolocation(), Some(GeoOutcome::Found(_))))
        .count();
    let stats = orchestrator.stats().summary();

    info!(
        "Scan finished in {:.2}s: {} private, {} geolocated",
        elapsed_seconds, private_ips, geolocated
    );
    stats.log();

    Ok(ScanReport {
        total_ips: results.len(),
        results,
        private_ips,
        geolocated,
        stats,
        elapsed_seconds,
    })
}
