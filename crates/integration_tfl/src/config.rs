//! TfL gateway configuration

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Configuration for the Transport for London unified API
#[derive(Clone, Serialize, Deserialize)]
pub struct TflConfig {
    /// Base URL for the TfL unified API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Application identifier sent as `app_id` (sensitive - uses SecretString)
    #[serde(default, skip_serializing)]
    pub app_id: Option<SecretString>,

    /// Application key sent as `app_key` (sensitive - uses SecretString)
    #[serde(default, skip_serializing)]
    pub app_key: Option<SecretString>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Line mode used by `/line_status` when no mode is given
    #[serde(default = "default_line_mode")]
    pub default_line_mode: String,

    /// User agent sent with every upstream request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "https://api.tfl.gov.uk".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

fn default_line_mode() -> String {
    "tube".to_string()
}

fn default_user_agent() -> String {
    format!("tfl-gateway/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for TflConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            app_id: None,
            app_key: None,
            timeout_secs: default_timeout_secs(),
            default_line_mode: default_line_mode(),
            user_agent: default_user_agent(),
        }
    }
}

impl std::fmt::Debug for TflConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TflConfig")
            .field("base_url", &self.base_url)
            .field("app_id", &self.app_id.as_ref().map(|_| "[REDACTED]"))
            .field("app_key", &self.app_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .field("default_line_mode", &self.default_line_mode)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl TflConfig {
    /// Create a configuration pointing at a mock server
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            app_id: Some(SecretString::from("test-app-id")),
            app_key: Some(SecretString::from("test-app-key")),
            timeout_secs: 5,
            ..Default::default()
        }
    }

    /// Whether both upstream credentials are present and non-empty
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        let present = |s: &Option<SecretString>| {
            s.as_ref().is_some_and(|v| !v.expose_secret().is_empty())
        };
        present(&self.app_id) && present(&self.app_key)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("base_url must not be empty".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        if self.default_line_mode.trim().is_empty() {
            return Err("default_line_mode must not be empty".to_string());
        }

        Ok(())
    }
}
