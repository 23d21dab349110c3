//! Configuration constants.
//!
//! This module defines the default endpoints, timeouts and limits used
//! throughout the application.

use std::time::Duration;

/// Per-request timeout in seconds for every provider call.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// TCP connection timeout in seconds for the shared HTTP client.
pub const TCP_CONNECT_TIMEOUT_SECS: u64 = 5;

/// User-Agent sent with every provider request.
pub const DEFAULT_USER_AGENT: &str = concat!("ip_lookup/", env!("CARGO_PKG_VERSION"));

// Provider identifiers (used in `geo_fallback_order` and the registry)
pub const PROVIDER_IPINFO: &str = "ipinfo";
pub const PROVIDER_IPAPI: &str = "ipapi.com";
pub const PROVIDER_ABUSEIPDB: &str = "abuseipdb";

/// Geolocation providers tried in this order unless configured otherwise.
pub const DEFAULT_GEO_FALLBACK_ORDER: &[&str] = &[PROVIDER_IPINFO, PROVIDER_IPAPI];

/// Threat provider consulted unless configured otherwise.
pub const DEFAULT_THREAT_PROVIDER: &str = PROVIDER_ABUSEIPDB;

// Provider endpoints
pub const IPINFO_BASE_URL: &str = "https://ipinfo.io";
pub const IPAPI_BASE_URL: &str = "http://ip-api.com";
pub const ABUSEIPDB_BASE_URL: &str = "https://api.abuseipdb.com";

/// Fields requested from ip-api.com.
pub const IPAPI_FIELDS: &str = "status,message,country,city,lat,lon,isp,org,query,reverse";

/// Look-back window passed to AbuseIPDB.
pub const ABUSEIPDB_MAX_AGE_DAYS: u32 = 90;

/// Placeholder value shipped in sample configuration files.
///
/// A key equal to this is treated the same as a missing key.
pub const ABUSEIPDB_PLACEHOLDER_KEY: &str = "YOUR_ABUSEIPDB_API_KEY_HERE";

// Result messages
pub const PRIVATE_IP_MESSAGE: &str = "Private IP address";
pub const ALL_GEO_FAILED_MESSAGE: &str = "All geolocation providers failed.";
pub const THREAT_NOT_CONFIGURED_MESSAGE: &str = "AbuseIPDB API key not configured.";

/// Default limit on the usable hosts of one CIDR target.
///
/// Any IPv4 network up to a /8 fits; larger IPv4 blocks and most IPv6
/// prefixes are rejected instead of being materialized.
pub const MAX_CIDR_HOSTS: u64 = 1 << 24;

/// How often a caller polls a running scan worker for its result.
pub const RESULT_POLL_INTERVAL: Duration = Duration::from_millis(100);
