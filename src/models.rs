//! Lookup result records.
//!
//! The serialized form of these types is the report format: a list of
//! `{ip, error}` or `{ip, geolocation, threat_intel}` objects. Enums are
//! untagged so the JSON carries no variant names.

use serde::{Deserialize, Serialize};

use crate::config::{PRIVATE_IP_MESSAGE, THREAT_NOT_CONFIGURED_MESSAGE};

/// Normalized geolocation data from one provider.
///
/// Fields the provider does not supply stay `None` (serialized as `null`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoRecord {
    pub provider: String,
    pub ip: Option<String>,
    pub hostname: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
    /// "lat,lon"
    pub loc: Option<String>,
    pub org: Option<String>,
    pub postal: Option<String>,
}

/// Normalized threat-reputation data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThreatRecord {
    pub provider: String,
    pub is_whitelisted: Option<bool>,
    pub abuse_confidence_score: Option<u32>,
    pub total_reports: Option<u64>,
    pub usage_type: Option<String>,
}

/// The `geolocation` slot of a result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GeoOutcome {
    Failed { error: String },
    Found(GeoRecord),
}

/// The `threat_intel` slot of a result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ThreatOutcome {
    Failed { error: String },
    Found(ThreatRecord),
    /// Threat lookup switched off; serializes as `{}`
    Disabled {},
}

impl ThreatOutcome {
    /// Result for a threat provider that has no usable API key.
    pub fn not_configured() -> Self {
        ThreatOutcome::Failed {
            error: THREAT_NOT_CONFIGURED_MESSAGE.to_string(),
        }
    }

    pub fn record(&self) -> Option<&ThreatRecord> {
        match self {
            ThreatOutcome::Found(record) => Some(record),
            _ => None,
        }
    }
}

impl GeoOutcome {
    pub fn record(&self) -> Option<&GeoRecord> {
        match self {
            GeoOutcome::Found(record) => Some(record),
            GeoOutcome::Failed { .. } => None,
        }
    }
}

/// Everything learned about one IP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LookupResult {
    Resolved {
        ip: String,
        geolocation: GeoOutcome,
        threat_intel: ThreatOutcome,
    },
    /// Terminal error for the whole IP (private address)
    Failed { ip: String, error: String },
}

impl LookupResult {
    /// Fixed result for a private or reserved address.
    pub fn private(ip: impl Into<String>) -> Self {
        LookupResult::Failed {
            ip: ip.into(),
            error: PRIVATE_IP_MESSAGE.to_string(),
        }
    }

    pub fn ip(&self) -> &str {
        match self {
            LookupResult::Resolved { ip, .. } | LookupResult::Failed { ip, .. } => ip,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LookupResult::Failed { error, .. } => Some(error),
            LookupResult::Resolved { .. } => None,
        }
    }

    pub fn geolocation(&self) -> Option<&GeoOutcome> {
        match self {
            LookupResult::Resolved { geolocation, .. } => Some(geolocation),
            LookupResult::Failed { .. } => None,
        }
    }

    pub fn threat_intel(&self) -> Option<&ThreatOutcome> {
        match self {
            LookupResult::Resolved { threat_intel, .. } => Some(threat_intel),
            LookupResult::Failed { .. } => None,
        }
    }
}
