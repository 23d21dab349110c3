//! Provider lookup table.

use std::collections::HashMap;
use std::sync::Arc;

use super::{AbuseIpDbProvider, GeoProvider, IpApiProvider, IpInfoProvider, ThreatProvider};
use crate::config::{Config, PROVIDER_ABUSEIPDB, PROVIDER_IPAPI, PROVIDER_IPINFO};
use crate::error_handling::ConfigError;

/// Identifier → provider mapping, consulted by name for fallback ordering.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    geo: HashMap<String, Arc<dyn GeoProvider>>,
    threat: HashMap<String, Arc<dyn ThreatProvider>>,
}

impl ProviderRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in providers, configured from `config`.
    ///
    /// | id          | provider       |
    /// |-------------|----------------|
    /// | `ipinfo`    | ipinfo.io      |
    /// | `ipapi.com` | ip-api.com     |
    /// | `abuseipdb` | AbuseIPDB      |
    pub fn standard(config: &Config) -> Self {
        let timeout = config.timeout();
        Self::new()
            .with_geo(
                PROVIDER_IPINFO,
                IpInfoProvider::new(config.ipinfo_key.clone(), timeout),
            )
            .with_geo(PROVIDER_IPAPI, IpApiProvider::new(timeout))
            .with_threat(
                PROVIDER_ABUSEIPDB,
                AbuseIpDbProvider::new(config.abuseipdb_key.clone(), timeout),
            )
    }

    /// Registers (or replaces) a geolocation provider.
    pub fn with_geo(mut self, id: impl Into<String>, provider: impl GeoProvider + 'static) -> Self {
        self.geo.insert(id.into(), Arc::new(provider));
        self
    }

    /// Registers (or replaces) a threat provider.
    pub fn with_threat(
        mut self,
        id: impl Into<String>,
        provider: impl ThreatProvider + 'static,
    ) -> Self {
        self.threat.insert(id.into(), Arc::new(provider));
        self
    }

    /// Resolves a fallback order into providers, in that order.
    ///
    /// # Errors
    ///
    /// - `ConfigError::EmptyFallbackOrder` if `order` is empty
    /// - `ConfigError::UnknownProvider` for the first unregistered id
    pub fn geo_chain<S: AsRef<str>>(
        &self,
        order: &[S],
    ) -> Result<Vec<Arc<dyn GeoProvider>>, ConfigError> {
        if order.is_empty() {
            return Err(ConfigError::EmptyFallbackOrder);
        }
        order
            .iter()
            .map(|id| {
                let id = id.as_ref();
                self.geo
                    .get(id)
                    .cloned()
                    .ok_or_else(|| ConfigError::UnknownProvider {
                        kind: "geolocation",
                        name: id.to_string(),
                    })
            })
            .collect()
    }

    /// Looks up a threat provider by id.
    pub fn threat(&self, id: &str) -> Result<Arc<dyn ThreatProvider>, ConfigError> {
        self.threat
            .get(id)
            .cloned()
            .ok_or_else(|| ConfigError::UnknownProvider {
                kind: "threat",
                name: id.to_string(),
            })
    }

    /// Registered geolocation ids, sorted.
    pub fn geo_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.geo.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut threat: Vec<&str> = self.threat.keys().map(String::as_str).collect();
        threat.sort_unstable();
        f.debug_struct("ProviderRegistry")
            .field("geo", &self.geo_ids())
            .field("threat", &threat)
            .finish()
    }
}
