//! Route definitions

use axum::{Router, http::Uri, routing::get};

use crate::{error::ApiError, handlers, state::AppState};

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health and status endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        // Transit API
        .route("/search/{query}", get(handlers::transit::search_stop))
        .route("/bus/{stop_id}", get(handlers::transit::bus_arrivals))
        .route("/line_status", get(handlers::transit::line_status))
        .route(
            "/line_status/{mode}",
            get(handlers::transit::line_status_for_mode),
        )
        .route(
            "/journey/{origin}/{destination}",
            get(handlers::transit::journey),
        )
        .fallback(not_found)
        // Attach state
        .with_state(state)
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(uri.path().to_string())
}
