//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::constants::{
    DEFAULT_GEO_FALLBACK_ORDER, DEFAULT_THREAT_PROVIDER, DEFAULT_TIMEOUT_SECS, MAX_CIDR_HOSTS,
    PROVIDER_IPAPI, PROVIDER_IPINFO,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Library configuration (no CLI dependencies).
///
/// Holds the API keys, the per-request timeout and the geolocation fallback
/// order. It can be constructed programmatically or converted from [`Opt`].
///
/// # Examples
///
/// ```no_run
/// use ip_lookup::Config;
///
/// let config = Config {
///     ipinfo_key: "my-token".to_string(),
///     timeout_seconds: 5,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// ipinfo.io access token (may be empty; ipinfo then applies its anonymous quota)
    pub ipinfo_key: String,

    /// AbuseIPDB API key (empty disables the threat lookup with an error field)
    pub abuseipdb_key: String,

    /// Per-request timeout in seconds
    pub timeout_seconds: u64,

    /// Geolocation providers to try, in order
    pub geo_fallback_order: Vec<String>,

    /// Threat provider to consult
    pub threat_provider: String,

    /// Largest number of usable hosts one CIDR target may expand to
    pub max_cidr_hosts: u64,

    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,
}

impl Config {
    /// Per-request timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ipinfo_key: String::new(),
            abuseipdb_key: String::new(),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            geo_fallback_order: DEFAULT_GEO_FALLBACK_ORDER
                .iter()
                .map(|s| s.to_string())
                .collect(),
            threat_provider: DEFAULT_THREAT_PROVIDER.to_string(),
            max_cidr_hosts: MAX_CIDR_HOSTS,
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
        }
    }
}

/// Command-line options.
///
/// # Examples
///
/// ```bash
/// # Look up two addresses
/// ip_lookup 8.8.8.8 1.1.1.1
///
/// # Expand a file of targets, skip threat intel, save a CSV report
/// ip_lookup --file targets.txt --no-threat --output report.csv
///
/// # Read targets from stdin and prefer ip-api.com
/// cat targets.txt | ip_lookup --file - --geo-fallback-order ipapi.com,ipinfo
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "ip_lookup",
    about = "Looks up geolocation and threat reputation for IP addresses and CIDR ranges."
)]
pub struct Opt {
    /// IP addresses or CIDR ranges to look up
    #[arg(value_name = "TARGET")]
    pub targets: Vec<String>,

    /// File with one IP or CIDR per line (`-` reads stdin)
    #[arg(long, short = 'f', value_parser)]
    pub file: Option<PathBuf>,

    /// Skip the threat-intelligence lookup
    #[arg(long)]
    pub no_threat: bool,

    /// Save a report; the format follows the extension (.json, .csv, .html)
    #[arg(long, short = 'o', value_parser)]
    pub output: Option<PathBuf>,

    /// ipinfo.io access token
    #[arg(long, env = "IPINFO_API_KEY", default_value = "", hide_env_values = true)]
    pub ipinfo_key: String,

    /// AbuseIPDB API key
    #[arg(long, env = "ABUSEIPDB_API_KEY", default_value = "", hide_env_values = true)]
    pub abuseipdb_key: String,

    /// Per-request timeout in seconds (at least 1)
    #[arg(
        long,
        default_value_t = DEFAULT_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout_seconds: u64,

    /// Reject CIDR targets with more usable hosts than this
    #[arg(
        long,
        default_value_t = MAX_CIDR_HOSTS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub max_cidr_hosts: u64,

    /// Geolocation providers to try, in order (comma-separated)
    #[arg(
        long,
        value_delimiter = ',',
        default_values_t = vec![PROVIDER_IPINFO.to_string(), PROVIDER_IPAPI.to_string()]
    )]
    pub geo_fallback_order: Vec<String>,

    /// Sort the results table by this column
    #[arg(long, value_enum)]
    pub sort_by: Option<crate::report::Column>,

    /// Reverse the table sort order
    #[arg(long)]
    pub reverse: bool,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

impl From<&Opt> for Config {
    fn from(opt: &Opt) -> Self {
        Self {
            ipinfo_key: opt.ipinfo_key.clone(),
            abuseipdb_key: opt.abuseipdb_key.clone(),
            timeout_seconds: opt.timeout_seconds,
            geo_fallback_order: opt.geo_fallback_order.clone(),
            threat_provider: DEFAULT_THREAT_PROVIDER.to_string(),
            max_cidr_hosts: opt.max_cidr_hosts,
            log_level: opt.log_level.clone(),
            log_format: opt.log_format.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Warn),
            log::LevelFilter::Warn
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Info),
            log::LevelFilter::Info
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.timeout_seconds, 10);
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.geo_fallback_order, vec!["ipinfo", "ipapi.com"]);
        assert_eq!(config.threat_provider, "abuseipdb");
        assert!(config.ipinfo_key.is_empty());
        assert!(config.abuseipdb_key.is_empty());
        assert_eq!(config.max_cidr_hosts, 16_777_216);
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let err = Opt::try_parse_from(["ip_lookup", "--timeout-seconds", "0", "8.8.8.8"])
            .expect_err("a zero timeout would fail every request");
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);

        assert!(Opt::try_parse_from(["ip_lookup", "--max-cidr-hosts", "0"]).is_err());
        let opt = Opt::try_parse_from(["ip_lookup", "--timeout-seconds", "1"])
            .expect("one second is the smallest timeout");
        assert_eq!(opt.timeout_seconds, 1);
    }

    #[test]
    fn test_opt_parses_fallback_order_list() {
        let opt = Opt::try_parse_from([
            "ip_lookup",
            "--geo-fallback-order",
            "ipapi.com,ipinfo",
            "--timeout-seconds",
            "3",
            "8.8.8.8",
        ])
        .expect("options should parse");

        let config = Config::from(&opt);
        assert_eq!(config.geo_fallback_order, vec!["ipapi.com", "ipinfo"]);
        assert_eq!(config.timeout_seconds, 3);
        assert_eq!(opt.targets, vec!["8.8.8.8"]);
        assert!(!opt.no_threat);
    }

    #[test]
    fn test_opt_defaults() {
        let opt = Opt::try_parse_from(["ip_lookup", "--no-threat"]).expect("options should parse");
        assert!(opt.no_threat);
        assert!(opt.targets.is_empty());
        assert!(opt.file.is_none());
        assert!(opt.output.is_none());
        assert_eq!(opt.geo_fallback_order, vec!["ipinfo", "ipapi.com"]);
    }
}
