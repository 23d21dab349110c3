//! Geolocation and threat-intelligence provider clients.
//!
//! Every external service is wrapped in a type implementing one of two
//! capability traits:
//! - [`GeoProvider`] - returns a normalized [`GeoRecord`]
//! - [`ThreatProvider`] - returns a [`ThreatOutcome`]
//!
//! Clients do not own an HTTP client. The orchestrator creates one per scan
//! and passes it into every `fetch`, so all calls share one connection pool.
//!
//! Providers are looked up by identifier in a [`ProviderRegistry`], which is
//! built explicitly and handed to the orchestrator. Adding a provider means
//! implementing a trait and registering it; the orchestrator is untouched.

mod abuseipdb;
mod ipapi;
mod ipinfo;
mod registry;

use async_trait::async_trait;

use crate::error_handling::ProviderError;
use crate::models::{GeoRecord, ThreatOutcome};

pub use abuseipdb::AbuseIpDbProvider;
pub use ipapi::IpApiProvider;
pub use ipinfo::IpInfoProvider;
pub use registry::ProviderRegistry;

/// A geolocation lookup service.
#[async_trait]
pub trait GeoProvider: Send + Sync {
    /// Human-readable provider name (also written into the record).
    fn name(&self) -> &'static str;

    /// Looks up `ip` with one HTTP request.
    ///
    /// # Errors
    ///
    /// Any transport failure, timeout, non-success status, undecodable body
    /// or provider-reported failure.
    async fn fetch(&self, client: &reqwest::Client, ip: &str) -> Result<GeoRecord, ProviderError>;
}

/// A threat-reputation lookup service.
#[async_trait]
pub trait ThreatProvider: Send + Sync {
    /// Human-readable provider name (also written into the record).
    fn name(&self) -> &'static str;

    /// Looks up `ip`.
    ///
    /// A provider without credentials returns `Ok(ThreatOutcome::Failed { .. })`
    /// without making a request; that is a normal result, not an error.
    async fn fetch(
        &self,
        client: &reqwest::Client,
        ip: &str,
    ) -> Result<ThreatOutcome, ProviderError>;
}

/// Joins a base URL and a path without doubling the slash.
pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
