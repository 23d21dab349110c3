//! Provider error categorization.

use super::types::{ProviderError, ProviderErrorKind};

/// Categorizes a `reqwest::Error` into a `ProviderErrorKind`.
///
/// Timeouts are checked first: a request that timed out while connecting is
/// reported as a timeout, not a connect error.
pub fn categorize_reqwest_error(error: &reqwest::Error) -> ProviderErrorKind {
    if error.is_timeout() {
        ProviderErrorKind::Timeout
    } else if error.is_status() || error.status().is_some() {
        ProviderErrorKind::HttpStatus
    } else if error.is_connect() {
        ProviderErrorKind::Connect
    } else if error.is_decode() || error.is_body() {
        ProviderErrorKind::Decode
    } else {
        ProviderErrorKind::Other
    }
}

/// Categorizes any provider failure.
pub fn categorize_provider_error(error: &ProviderError) -> ProviderErrorKind {
    match error {
        ProviderError::Http { source, .. } => categorize_reqwest_error(source),
        ProviderError::Rejected { .. } => ProviderErrorKind::LogicalFailure,
    }
}
