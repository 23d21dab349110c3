//! HTTP client initialization.

use std::time::Duration;

use reqwest::ClientBuilder;

use crate::config::{Config, DEFAULT_USER_AGENT, TCP_CONNECT_TIMEOUT_SECS};

/// Builds the HTTP client shared by every provider call in one scan.
///
/// The client owns the connection pool for the batch; dropping it at the end
/// of the scan closes the pool.
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails (e.g. the TLS backend
/// cannot be initialized).
pub fn init_client(config: &Config) -> Result<reqwest::Client, reqwest::Error> {
    let connect_timeout = Duration::from_secs(TCP_CONNECT_TIMEOUT_SECS).min(config.timeout());
    ClientBuilder::new()
        .timeout(config.timeout())
        .connect_timeout(connect_timeout)
        .user_agent(DEFAULT_USER_AGENT)
        .build()
}
