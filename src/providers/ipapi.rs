//! ip-api.com geolocation client.
//!
//! ip-api answers HTTP 200 even for failed lookups and signals the failure
//! with `"status": "fail"` in the body. That is turned into a
//! `ProviderError::Rejected` so the fallback chain moves on.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use serde::Deserialize;

use super::{endpoint, GeoProvider};
use crate::config::{DEFAULT_TIMEOUT_SECS, IPAPI_BASE_URL, IPAPI_FIELDS};
use crate::error_handling::ProviderError;
use crate::models::GeoRecord;

const PROVIDER_NAME: &str = "ip-api.com";

/// `GET {base}/json/{ip}?fields=...`
#[derive(Debug, Clone)]
pub struct IpApiProvider {
    base_url: String,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: Option<String>,
    message: Option<String>,
    country: Option<String>,
    city: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    isp: Option<String>,
    org: Option<String>,
    query: Option<String>,
    reverse: Option<String>,
}

impl IpApiProvider {
    pub fn new(timeout: Duration) -> Self {
        Self {
            base_url: IPAPI_BASE_URL.to_string(),
            timeout,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl Default for IpApiProvider {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }
}

impl IpApiResponse {
    fn into_record(self) -> Result<GeoRecord, ProviderError> {
        if self.status.as_deref() == Some("fail") {
            return Err(ProviderError::Rejected {
                provider: PROVIDER_NAME,
                message: self.message.unwrap_or_else(|| "unknown error".to_string()),
            });
        }

        let loc = match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some(format!("{},{}", lat, lon)),
            _ => None,
        };
        let org = self.org.filter(|org| !org.is_empty()).or(self.isp);

        Ok(GeoRecord {
            provider: PROVIDER_NAME.to_string(),
            ip: self.query,
            hostname: self.reverse.filter(|host| !host.is_empty()),
            city: self.city,
            region: None,
            country: self.country,
            loc,
            org,
            postal: None,
        })
    }
}

#[async_trait]
impl GeoProvider for IpApiProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    async fn fetch(&self, client: &reqwest::Client, ip: &str) -> Result<GeoRecord, ProviderError> {
        let url = endpoint(&self.base_url, &format!("json/{}", ip));
        debug!("{} lookup for {}", PROVIDER_NAME, ip);

        let data: IpApiResponse = client
            .get(&url)
            .query(&[("fields", IPAPI_FIELDS)])
            .timeout(self.timeout)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| ProviderError::http(PROVIDER_NAME, e))?
            .json()
            .await
            .map_err(|e| ProviderError::http(PROVIDER_NAME, e))?;

        data.into_record()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httptest::{matchers::*, responders::*, Expectation, Server};
    use serde_json::json;

    fn provider_for(server: &Server) -> IpApiProvider {
        IpApiProvider::new(Duration::from_secs(5)).with_base_url(format!("http://{}", server.addr()))
    }

    #[tokio::test]
    async fn test_fetch_normalizes_response() {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("GET", "/json/8.8.8.8"),
                request::query(url_decoded(contains(("fields", IPAPI_FIELDS)))),
            ])
            .respond_with(json_encoded(json!({
                "status": "success",
                "country": "United States",
                "city": "Ashburn",
                "lat": 39.03,
                "lon": -77.5,
                "isp": "Google LLC",
                "org": "Google Public DNS",
                "query": "8.8.8.8",
                "reverse": "dns.google"
            }))),
        );

        let client = reqwest::Client::new();
        let record = provider_for(&server)
            .fetch(&client, "8.8.8.8")
            .await
            .expect("lookup should succeed");

        assert_eq!(record.provider, "ip-api.com");
        assert_eq!(record.ip.as_deref(), Some("8.8.8.8"));
        assert_eq!(record.hostname.as_deref(), Some("dns.google"));
        assert_eq!(record.loc.as_deref(), Some("39.03,-77.5"));
        assert_eq!(record.org.as_deref(), Some("Google Public DNS"));
        assert!(record.region.is_none());
        assert!(record.postal.is_none());
    }

    #[tokio::test]
    async fn test_status_fail_is_rejected_despite_200() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/json/203.0.113.9"))
                .respond_with(json_encoded(json!({
                    "status": "fail",
                    "message": "reserved range",
                    "query": "203.0.113.9"
                }))),
        );

        let client = reqwest::Client::new();
        let err = provider_for(&server)
            .fetch(&client, "203.0.113.9")
            .await
            .expect_err("status=fail must be a failure");

        assert_eq!(err.to_string(), "ip-api.com failed: reserved range");
    }

    #[test]
    fn test_org_falls_back_to_isp_and_loc_needs_both_coordinates() {
        let response = IpApiResponse {
            status: Some("success".to_string()),
            message: None,
            country: Some("Germany".to_string()),
            city: None,
            lat: Some(50.1),
            lon: None,
            isp: Some("Hetzner Online GmbH".to_string()),
            org: Some(String::new()),
            query: Some("88.198.1.1".to_string()),
            reverse: Some(String::new()),
        };

        let record = response.into_record().expect("success payload");
        assert_eq!(record.org.as_deref(), Some("Hetzner Online GmbH"));
        assert!(record.loc.is_none());
        assert!(record.hostname.is_none());
    }
}
