//! ipinfo.io geolocation client.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use serde::Deserialize;

use super::{endpoint, GeoProvider};
use crate::config::{DEFAULT_TIMEOUT_SECS, IPINFO_BASE_URL};
use crate::error_handling::ProviderError;
use crate::models::GeoRecord;

const PROVIDER_NAME: &str = "ipinfo.io";

/// `GET {base}/{ip}?token=<key>`
#[derive(Debug, Clone)]
pub struct IpInfoProvider {
    base_url: String,
    token: String,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct IpInfoResponse {
    ip: Option<String>,
    hostname: Option<String>,
    city: Option<String>,
    region: Option<String>,
    country: Option<String>,
    loc: Option<String>,
    org: Option<String>,
    postal: Option<String>,
}

impl IpInfoProvider {
    pub fn new(token: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: IPINFO_BASE_URL.to_string(),
            token: token.into(),
            timeout,
        }
    }

    /// Points the client at another host (mirrors, mock servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl Default for IpInfoProvider {
    fn default() -> Self {
        Self::new("", Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }
}

#[async_trait]
impl GeoProvider for IpInfoProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    async fn fetch(&self, client: &reqwest::Client, ip: &str) -> Result<GeoRecord, ProviderError> {
        let url = endpoint(&self.base_url, ip);
        debug!("{} lookup for {}", PROVIDER_NAME, ip);

        let data: IpInfoResponse = client
            .get(&url)
            .query(&[("token", self.token.as_str())])
            .timeout(self.timeout)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| ProviderError::http(PROVIDER_NAME, e))?
            .json()
            .await
            .map_err(|e| ProviderError::http(PROVIDER_NAME, e))?;

        Ok(GeoRecord {
            provider: PROVIDER_NAME.to_string(),
            ip: data.ip,
            hostname: data.hostname,
            city: data.city,
            region: data.region,
            country: data.country,
            loc: data.loc,
            org: data.org,
            postal: data.postal,
        })
    }
}
