//! Geolocation fallback chain.

use std::sync::Arc;

use log::debug;

use crate::config::ALL_GEO_FAILED_MESSAGE;
use crate::error_handling::ScanStats;
use crate::models::GeoOutcome;
use crate::providers::GeoProvider;

/// Tries each provider in order and returns the first success.
///
/// Providers are awaited one at a time: the next request is only sent after
/// the previous one has failed. Later providers are never consulted once one
/// succeeds. Every failure is logged and counted, then swallowed.
pub async fn fetch_geo_with_fallback(
    chain: &[Arc<dyn GeoProvider>],
    client: &reqwest::Client,
    ip: &str,
    stats: &ScanStats,
) -> GeoOutcome {
    for provider in chain {
        match provider.fetch(client, ip).await {
            Ok(record) => return GeoOutcome::Found(record),
            Err(e) => {
                debug!("Geolocation via {} failed for {}: {}", provider.name(), ip, e);
                stats.record_failure(&e);
            }
        }
    }

    stats.record_geo_exhausted();
    GeoOutcome::Failed {
        error: ALL_GEO_FAILED_MESSAGE.to_string(),
    }
}
