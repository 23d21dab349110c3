//! Error type definitions.
//!
//! This module defines all error types used throughout the application.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the shared HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),

    /// Error building the scan worker's event loop.
    #[error("Runtime initialization error: {0}")]
    RuntimeError(#[from] std::io::Error),
}

/// A single provider call failed.
///
/// These never escape the orchestrator: they are logged, counted and turned
/// into an `error` field on the affected record.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Transport, timeout, non-success status or body decode failure.
    #[error("{provider} request failed: {source}")]
    Http {
        provider: &'static str,
        #[source]
        source: ReqwestError,
    },

    /// The provider answered but flagged the lookup as failed.
    #[error("{provider} failed: {message}")]
    Rejected {
        provider: &'static str,
        message: String,
    },
}

impl ProviderError {
    /// Wraps a `reqwest::Error` raised while talking to `provider`.
    pub fn http(provider: &'static str, source: ReqwestError) -> Self {
        ProviderError::Http { provider, source }
    }

    /// Name of the provider that failed.
    pub fn provider(&self) -> &'static str {
        match self {
            ProviderError::Http { provider, .. } | ProviderError::Rejected { provider, .. } => {
                provider
            }
        }
    }
}

/// Error types for provider configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A provider name in the configuration is not registered.
    #[error("Unknown {kind} provider: {name}")]
    UnknownProvider { kind: &'static str, name: String },

    /// The geolocation fallback order lists no providers.
    #[error("Geolocation fallback order is empty")]
    EmptyFallbackOrder,
}

/// Problems with the user-supplied target list.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// Nothing was entered.
    #[error("Please enter at least one IP address or CIDR.")]
    NoTargets,

    /// Every entry was invalid.
    #[error("No valid IP addresses found.")]
    NoValidTargets,
}

/// Failures that abort a whole scan.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Initialization(#[from] InitializationError),

    /// The scan was cancelled before it completed.
    #[error("Scan cancelled")]
    Cancelled,

    /// The worker thread went away without delivering a result.
    #[error("Scan worker stopped unexpectedly")]
    WorkerStopped,
}

/// Error types for report export.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The output path has an extension we cannot write.
    #[error("Unsupported report extension: {0}")]
    UnsupportedFormat(String),

    /// There is nothing to export.
    #[error("No results to export")]
    EmptyResults,
}

/// Categories of provider failures, used for end-of-scan statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ProviderErrorKind {
    Timeout,
    Connect,
    HttpStatus,
    Decode,
    LogicalFailure,
    Other,
}

impl std::fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ProviderErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderErrorKind::Timeout => "Provider timeout",
            ProviderErrorKind::Connect => "Provider connect error",
            ProviderErrorKind::HttpStatus => "Provider HTTP status error",
            ProviderErrorKind::Decode => "Provider response decode error",
            ProviderErrorKind::LogicalFailure => "Provider reported failure",
            ProviderErrorKind::Other => "Provider other error",
        }
    }
}
