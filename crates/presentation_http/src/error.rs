//! API error handling
//!
//! Every failure leaves the server as `{"error": "<message>"}`, whatever its
//! origin. The HTTP status code tells callers which kind of failure it was.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use integration_tfl::TflError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Failure reported by the TfL gateway
    #[error(transparent)]
    Gateway(#[from] TflError),

    /// No route matched the request path
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Error response body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

impl ApiError {
    /// HTTP status code for this error
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Gateway(err) => match err {
                TflError::NoStopsFound => StatusCode::NOT_FOUND,
                TflError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
                TflError::UpstreamStatus { .. }
                | TflError::ConnectionFailed(_)
                | TflError::ParseError(_) => StatusCode::BAD_GATEWAY,
                TflError::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
                TflError::InvalidPathSegment(_) => StatusCode::BAD_REQUEST,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if let Self::Gateway(err) = &self
            && err.is_upstream_failure()
        {
            warn!(error = %err, status = status.as_u16(), "Upstream call failed");
        }

        let body = ErrorResponse {
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
