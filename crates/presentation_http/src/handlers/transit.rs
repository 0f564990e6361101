//! Transit handlers
//!
//! Each handler forwards to one [`TransitGateway`](integration_tfl::TransitGateway)
//! operation and returns its result as JSON.

use axum::{
    Json,
    extract::{Path, State},
};
use integration_tfl::{ArrivalPrediction, JourneyOption, LineStatus, StopMatch};
use tracing::instrument;

use crate::{error::ApiError, state::AppState};

/// Search stop points by name
#[instrument(skip(state))]
pub async fn search_stop(
    State(state): State<AppState>,
    Path(query): Path<String>,
) -> Result<Json<Vec<StopMatch>>, ApiError> {
    let matches = state.gateway.search_stop_point(&query).await?;
    Ok(Json(matches))
}

/// Live arrivals at a stop, soonest first
#[instrument(skip(state))]
pub async fn bus_arrivals(
    State(state): State<AppState>,
    Path(stop_id): Path<String>,
) -> Result<Json<Vec<ArrivalPrediction>>, ApiError> {
    let arrivals = state.gateway.get_bus_arrivals(&stop_id).await?;
    Ok(Json(arrivals))
}

/// Status of every line of the default mode
#[instrument(skip(state))]
pub async fn line_status(State(state): State<AppState>) -> Result<Json<LineStatus>, ApiError> {
    let status = state.gateway.get_line_status().await?;
    Ok(Json(status))
}

/// Status of every line of a given mode
#[instrument(skip(state))]
pub async fn line_status_for_mode(
    State(state): State<AppState>,
    Path(mode): Path<String>,
) -> Result<Json<LineStatus>, ApiError> {
    let status = state.gateway.get_line_status_for_mode(&mode).await?;
    Ok(Json(status))
}

/// Up to three journey options between two places
#[instrument(skip(state))]
pub async fn journey(
    State(state): State<AppState>,
    Path((origin, destination)): Path<(String, String)>,
) -> Result<Json<Vec<JourneyOption>>, ApiError> {
    let options = state.gateway.get_journey(&origin, &destination).await?;
    Ok(Json(options))
}
