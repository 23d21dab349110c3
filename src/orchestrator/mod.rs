//! Per-IP lookup orchestration.
//!
//! For every IP the orchestrator:
//! 1. Short-circuits private/reserved addresses with a fixed error result
//! 2. Runs the geolocation fallback chain and the threat lookup concurrently
//! 3. Turns any provider failure into an `error` field on that slot only
//!
//! All IPs of a batch run concurrently on the caller's event loop and share
//! one HTTP client. Results come back in input order, one per input IP,
//! whatever the providers do.

mod fallback;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::future::join_all;
use log::{debug, warn};
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::error_handling::{ConfigError, InitializationError, ScanError, ScanStats};
use crate::initialization::init_client;
use crate::models::{LookupResult, ThreatOutcome};
use crate::providers::{GeoProvider, ProviderRegistry, ThreatProvider};
use crate::targets::is_private_ip;

pub use fallback::fetch_geo_with_fallback;

/// Per-scan switches chosen by the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanOptions {
    /// Skip the threat lookup; `threat_intel` is left empty
    pub no_threat: bool,
}

/// Runs lookups for a batch of IPs.
///
/// Built from a [`ProviderRegistry`]; the configured fallback order and
/// threat provider are resolved once, up front.
pub struct Orchestrator {
    config: Config,
    geo_chain: Vec<Arc<dyn GeoProvider>>,
    threat: Option<Arc<dyn ThreatProvider>>,
    stats: ScanStats,
    threat_warned: AtomicBool,
}

impl Orchestrator {
    /// Resolves providers for `config` from `registry`.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the fallback order is empty or names an
    /// unregistered provider, or if threat intel is enabled and the threat
    /// provider is unregistered.
    pub fn new(
        config: &Config,
        registry: &ProviderRegistry,
        options: ScanOptions,
    ) -> Result<Self, ConfigError> {
        let geo_chain = registry.geo_chain(&config.geo_fallback_order)?;
        let threat = if options.no_threat {
            None
        } else {
            Some(registry.threat(&config.threat_provider)?)
        };

        Ok(Self {
            config: config.clone(),
            geo_chain,
            threat,
            stats: ScanStats::new(),
            threat_warned: AtomicBool::new(false),
        })
    }

    /// Failure counters accumulated so far.
    pub fn stats(&self) -> &ScanStats {
        &self.stats
    }

    /// Looks up every IP with a fresh HTTP client.
    ///
    /// The client lives exactly as long as the batch.
    ///
    /// # Errors
    ///
    /// Only batch-level failures: the HTTP client cannot be built.
    pub async fn run(&self, ips: &[String]) -> Result<Vec<LookupResult>, ScanError> {
        let client = init_client(&self.config).map_err(InitializationError::from)?;
        let results = self.run_with_client(&client, ips).await;
        drop(client);
        Ok(results)
    }

    /// Like [`run`](Self::run), but gives up when `cancel` fires.
    ///
    /// In-flight requests are dropped and `ScanError::Cancelled` is returned
    /// instead of partial results.
    pub async fn run_until_cancelled(
        &self,
        ips: &[String],
        cancel: &CancellationToken,
    ) -> Result<Vec<LookupResult>, ScanError> {
        if cancel.is_cancelled() {
            return Err(ScanError::Cancelled);
        }
        tokio::select! {
            _ = cancel.cancelled() => Err(ScanError::Cancelled),
            results = self.run(ips) => results,
        }
    }

    /// Looks up every IP using a caller-provided client.
    ///
    /// Never fails: each slot of the returned vector corresponds to the IP at
    /// the same index of `ips`.
    pub async fn run_with_client(
        &self,
        client: &reqwest::Client,
        ips: &[String],
    ) -> Vec<LookupResult> {
        join_all(ips.iter().map(|ip| self.process_ip(client, ip))).await
    }

    /// Looks up a single IP.
    pub async fn process_ip(&self, client: &reqwest::Client, ip: &str) -> LookupResult {
        if is_private_ip(ip) {
            debug!("Skipping private address {}", ip);
            return LookupResult::private(ip);
        }

        let geo = fetch_geo_with_fallback(&self.geo_chain, client, ip, &self.stats);
        let (geolocation, threat_intel) = match &self.threat {
            Some(provider) => futures::join!(geo, self.fetch_threat(provider.as_ref(), client, ip)),
            None => (geo.await, ThreatOutcome::Disabled {}),
        };

        LookupResult::Resolved {
            ip: ip.to_string(),
            geolocation,
            threat_intel,
        }
    }

    async fn fetch_threat(
        &self,
        provider: &dyn ThreatProvider,
        client: &reqwest::Client,
        ip: &str,
    ) -> ThreatOutcome {
        match provider.fetch(client, ip).await {
            Ok(outcome) => {
                if outcome == ThreatOutcome::not_configured()
                    && !self.threat_warned.swap(true, Ordering::SeqCst)
                {
                    warn!("{} is not configured; threat intel will be empty", provider.name());
                }
                outcome
            }
            Err(e) => {
                debug!("Threat lookup via {} failed for {}: {}", provider.name(), ip, e);
                self.stats.record_failure(&e);
                ThreatOutcome::Failed {
                    error: e.to_string(),
                }
            }
        }
    }
}
