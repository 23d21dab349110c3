//! AbuseIPDB threat-reputation client.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use serde::Deserialize;

use super::{endpoint, ThreatProvider};
use crate::config::{
    ABUSEIPDB_BASE_URL, ABUSEIPDB_MAX_AGE_DAYS, ABUSEIPDB_PLACEHOLDER_KEY, DEFAULT_TIMEOUT_SECS,
};
use crate::error_handling::ProviderError;
use crate::models::{ThreatOutcome, ThreatRecord};

const PROVIDER_NAME: &str = "AbuseIPDB";

/// `GET {base}/api/v2/check?ipAddress=<ip>&maxAgeInDays=90` with a `Key` header.
#[derive(Debug, Clone)]
pub struct AbuseIpDbProvider {
    base_url: String,
    api_key: String,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct CheckResponse {
    #[serde(default)]
    data: CheckData,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CheckData {
    is_whitelisted: Option<bool>,
    abuse_confidence_score: Option<u32>,
    total_reports: Option<u64>,
    usage_type: Option<String>,
}

impl AbuseIpDbProvider {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: ABUSEIPDB_BASE_URL.to_string(),
            api_key: api_key.into(),
            timeout,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// False when the key is empty or still the sample placeholder.
    pub fn is_configured(&self) -> bool {
        let key = self.api_key.trim();
        !key.is_empty() && key != ABUSEIPDB_PLACEHOLDER_KEY
    }
}

impl Default for AbuseIpDbProvider {
    fn default() -> Self {
        Self::new("", Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }
}

#[async_trait]
impl ThreatProvider for AbuseIpDbProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    async fn fetch(
        &self,
        client: &reqwest::Client,
        ip: &str,
    ) -> Result<ThreatOutcome, ProviderError> {
        if !self.is_configured() {
            return Ok(ThreatOutcome::not_configured());
        }

        let url = endpoint(&self.base_url, "api/v2/check");
        let max_age = ABUSEIPDB_MAX_AGE_DAYS.to_string();
        debug!("{} lookup for {}", PROVIDER_NAME, ip);

        let body: CheckResponse = client
            .get(&url)
            .header("Key", &self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&[("ipAddress", ip), ("maxAgeInDays", max_age.as_str())])
            .timeout(self.timeout)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| ProviderError::http(PROVIDER_NAME, e))?
            .json()
            .await
            .map_err(|e| ProviderError::http(PROVIDER_NAME, e))?;

        let data = body.data;
        Ok(ThreatOutcome::Found(ThreatRecord {
            provider: PROVIDER_NAME.to_string(),
            is_whitelisted: data.is_whitelisted,
            abuse_confidence_score: data.abuse_confidence_score,
            total_reports: data.total_reports,
            usage_type: data.usage_type,
        }))
    }
}
