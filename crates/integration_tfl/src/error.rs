//! Gateway error types

use thiserror::Error;

/// Errors that can occur while calling the TfL API
///
/// The `Display` text of each variant is what HTTP callers see in the
/// `error` field of the response body.
#[derive(Debug, Error)]
pub enum TflError {
    /// Upstream answered with a status other than 200
    #[error("API error {status}")]
    UpstreamStatus {
        /// The numeric HTTP status returned by TfL
        status: u16,
    },

    /// Stop search returned a well-formed but empty match set
    #[error("No stops found")]
    NoStopsFound,

    /// Connection to TfL failed (DNS, refused, TLS, ...)
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },

    /// Failed to parse the upstream JSON payload
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Caller input that cannot be used as a single upstream path segment
    #[error("Invalid path segment '{0}'")]
    InvalidPathSegment(String),
}

impl TflError {
    /// Map a transport-level reqwest error
    ///
    /// The request URL carries the credentials, so it is stripped before the
    /// error text is kept.
    pub(crate) fn from_transport(err: reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout { timeout_secs }
        } else {
            Self::ConnectionFailed(err.without_url().to_string())
        }
    }

    /// Map a failure while reading the response body
    pub(crate) fn from_body(err: reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout { timeout_secs }
        } else {
            Self::ParseError(err.without_url().to_string())
        }
    }

    /// Whether the failure originated on the upstream side rather than locally
    #[must_use]
    pub const fn is_upstream_failure(&self) -> bool {
        matches!(
            self,
            Self::UpstreamStatus { .. }
                | Self::ConnectionFailed(_)
                | Self::Timeout { .. }
                | Self::ParseError(_)
        )
    }
}
