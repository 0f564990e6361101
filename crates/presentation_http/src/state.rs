//! Application state shared across handlers

use std::sync::Arc;

use integration_tfl::TransitGateway;

use crate::config::AppConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Gateway to the upstream transit API
    pub gateway: Arc<dyn TransitGateway>,
    /// Configuration the server was started with
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Create state around a gateway implementation and its configuration
    pub fn new(gateway: Arc<dyn TransitGateway>, config: Arc<AppConfig>) -> Self {
        Self { gateway, config }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
