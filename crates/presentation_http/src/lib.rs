//! TfL gateway HTTP presentation layer
//!
//! Exposes the [`integration_tfl`] gateway operations as a small JSON API.

pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod routes;
pub mod state;

pub use crate::config::{AppConfig, LogFormat, ServerConfig};
pub use error::{ApiError, ErrorResponse};
pub use middleware::RequestIdLayer;
pub use routes::create_router;
pub use state::AppState;
