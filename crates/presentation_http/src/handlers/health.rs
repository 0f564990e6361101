//! Liveness and readiness probes

use std::time::Instant;

use axum::{Json, extract::State, http::StatusCode};
use integration_tfl::HEALTH_PROBE_PATH;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::state::AppState;

/// Liveness response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Liveness check: the process is up and serving
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub upstream: UpstreamProbe,
}

/// Outcome of one probe against the TfL API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamProbe {
    /// Whether the probe got a success status back
    pub healthy: bool,
    /// Configured TfL base URL
    pub base_url: String,
    /// Path that was probed, relative to `base_url`
    pub probe: String,
    /// Round-trip time of the probe
    pub latency_ms: u64,
    /// Whether `app_id`/`app_key` are configured; anonymous callers get a lower rate limit
    pub authenticated: bool,
}

/// Readiness check: probe the TfL API once and report 503 if it is unreachable
pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let started = Instant::now();
    let healthy = state.gateway.is_healthy().await;
    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    let tfl = &state.config.tfl;
    let upstream = UpstreamProbe {
        healthy,
        base_url: tfl.base_url.clone(),
        probe: probe_path(),
        latency_ms,
        authenticated: tfl.has_credentials(),
    };

    if !healthy {
        warn!(base_url = %upstream.base_url, latency_ms, "TfL readiness probe failed");
    }

    let status_code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(ReadinessResponse {
            ready: healthy,
            upstream,
        }),
    )
}

fn probe_path() -> String {
    format!("/{}", HEALTH_PROBE_PATH.join("/"))
}
