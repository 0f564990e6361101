//! TfL unified API client
//!
//! Each operation is one GET against [api.tfl.gov.uk](https://api.tfl.gov.uk)
//! with the `app_id`/`app_key` credentials attached, followed by a reshape of
//! the JSON payload into the simplified models.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::ExposeSecret;
use serde::Deserialize;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::TflConfig;
use crate::error::TflError;
use crate::models::{ArrivalPrediction, JourneyOption, LineStatus, MAX_JOURNEY_OPTIONS, StopMatch};

/// Path probed by [`TransitGateway::is_healthy`]
pub const HEALTH_PROBE_PATH: [&str; 3] = ["Line", "Meta", "Modes"];

/// Trait for transit gateway implementations
#[async_trait]
pub trait TransitGateway: Send + Sync {
    /// Search stop points by free-text name
    async fn search_stop_point(&self, query: &str) -> Result<Vec<StopMatch>, TflError>;

    /// Live arrivals at a stop, soonest first
    async fn get_bus_arrivals(&self, stop_id: &str) -> Result<Vec<ArrivalPrediction>, TflError>;

    /// Status of every line of the configured default mode
    async fn get_line_status(&self) -> Result<LineStatus, TflError>;

    /// Status of every line of the given mode (e.g. "tube", "dlr")
    async fn get_line_status_for_mode(&self, mode: &str) -> Result<LineStatus, TflError>;

    /// Up to three journey options between two places
    async fn get_journey(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<Vec<JourneyOption>, TflError>;

    /// Check if the upstream API is reachable
    async fn is_healthy(&self) -> bool;
}

/// Gateway backed by the TfL unified API
#[derive(Debug)]
pub struct TflGatewayClient {
    client: Client,
    base_url: Url,
    config: TflConfig,
}

impl TflGatewayClient {
    /// Create a new TfL gateway client
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be initialized.
    pub fn new(config: &TflConfig) -> Result<Self, TflError> {
        config.validate().map_err(TflError::ConfigurationError)?;

        let base_url = Url::parse(&config.base_url)
            .map_err(|e| TflError::ConfigurationError(format!("invalid base_url: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(TflError::ConfigurationError(format!(
                "base_url cannot be a base: {}",
                config.base_url
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| TflError::ConfigurationError(e.without_url().to_string()))?;

        Ok(Self {
            client,
            base_url,
            config: config.clone(),
        })
    }

    /// Build an upstream URL from path segments, percent-encoding each one
    ///
    /// Empty, `.` and `..` segments are rejected: the URL serializer would
    /// drop or resolve them and so address a different upstream resource.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, TflError> {
        if let Some(bad) = segments
            .iter()
            .find(|s| s.is_empty() || **s == "." || **s == "..")
        {
            return Err(TflError::InvalidPathSegment((*bad).to_string()));
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| TflError::ConfigurationError("base_url cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Credential query parameters attached to every call
    fn credential_params(&self) -> Vec<(&'static str, &str)> {
        let mut params = Vec::with_capacity(2);
        if let Some(app_id) = &self.config.app_id {
            params.push(("app_id", app_id.expose_secret()));
        }
        if let Some(app_key) = &self.config.app_key {
            params.push(("app_key", app_key.expose_secret()));
        }
        params
    }

    /// Issue the GET and return the body of a 200 response
    async fn fetch(&self, url: Url) -> Result<String, TflError> {
        debug!(path = %url.path(), "Calling TfL");

        let response = self
            .client
            .get(url)
            .query(&self.credential_params())
            .send()
            .await
            .map_err(|e| TflError::from_transport(e, self.config.timeout_secs))?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!(status = status.as_u16(), "TfL returned an error status");
            return Err(TflError::UpstreamStatus {
                status: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| TflError::from_body(e, self.config.timeout_secs))
    }

    /// Parse a `StopPoint/Search` payload
    fn parse_search_response(body: &str) -> Result<Vec<StopMatch>, TflError> {
        let raw: RawSearchResponse =
            serde_json::from_str(body).map_err(|e| TflError::ParseError(e.to_string()))?;

        if raw.matches.is_empty() {
            return Err(TflError::NoStopsFound);
        }

        Ok(raw
            .matches
            .into_iter()
            .map(|m| StopMatch {
                name: m.name,
                id: m.id,
            })
            .collect())
    }

    /// Parse a `StopPoint/{id}/Arrivals` payload, sorted soonest first
    fn parse_arrivals_response(body: &str) -> Result<Vec<ArrivalPrediction>, TflError> {
        let raw: Vec<RawArrival> =
            serde_json::from_str(body).map_err(|e| TflError::ParseError(e.to_string()))?;

        let mut arrivals: Vec<ArrivalPrediction> = raw
            .into_iter()
            .map(|a| ArrivalPrediction::from_seconds(a.line_id, a.destination_name, a.time_to_station))
            .collect();

        // stable: ties keep upstream order
        arrivals.sort_by_key(|a| a.arrival_mins);
        Ok(arrivals)
    }

    /// Parse a `Line/Mode/{mode}/Status` payload
    fn parse_line_status_response(body: &str) -> Result<LineStatus, TflError> {
        let raw: Vec<RawLine> =
            serde_json::from_str(body).map_err(|e| TflError::ParseError(e.to_string()))?;

        Ok(raw
            .into_iter()
            .filter_map(|line| {
                let Some(current) = line.line_statuses.into_iter().next() else {
                    warn!(line = %line.name, "Line has no status entries, skipping");
                    return None;
                };
                Some((line.name, current.status_severity_description))
            })
            .collect())
    }

    /// Parse a `Journey/JourneyResults` payload, keeping the first options
    fn parse_journeys_response(body: &str) -> Result<Vec<JourneyOption>, TflError> {
        let raw: RawJourneyResults =
            serde_json::from_str(body).map_err(|e| TflError::ParseError(e.to_string()))?;

        Ok((1_u32..)
            .zip(raw.journeys.into_iter().take(MAX_JOURNEY_OPTIONS))
            .map(|(rank, journey)| JourneyOption {
                journey: rank,
                duration_mins: journey.duration,
                steps: journey
                    .legs
                    .into_iter()
                    .map(|leg| leg.instruction.summary)
                    .collect(),
            })
            .collect())
    }
}

#[async_trait]
impl TransitGateway for TflGatewayClient {
    #[instrument(skip(self))]
    async fn search_stop_point(&self, query: &str) -> Result<Vec<StopMatch>, TflError> {
        let url = self.endpoint(&["StopPoint", "Search", query])?;
        let body = self.fetch(url).await?;
        let matches = Self::parse_search_response(&body)?;

        debug!(count = matches.len(), "Stop points found");
        Ok(matches)
    }

    #[instrument(skip(self))]
    async fn get_bus_arrivals(&self, stop_id: &str) -> Result<Vec<ArrivalPrediction>, TflError> {
        let url = self.endpoint(&["StopPoint", stop_id, "Arrivals"])?;
        let body = self.fetch(url).await?;
        let arrivals = Self::parse_arrivals_response(&body)?;

        debug!(count = arrivals.len(), "Arrivals found");
        Ok(arrivals)
    }

    async fn get_line_status(&self) -> Result<LineStatus, TflError> {
        self.get_line_status_for_mode(&self.config.default_line_mode)
            .await
    }

    #[instrument(skip(self))]
    async fn get_line_status_for_mode(&self, mode: &str) -> Result<LineStatus, TflError> {
        let url = self.endpoint(&["Line", "Mode", mode, "Status"])?;
        let body = self.fetch(url).await?;
        let status = Self::parse_line_status_response(&body)?;

        if status.is_empty() {
            warn!("No line statuses returned");
        }

        debug!(count = status.len(), "Line statuses found");
        Ok(status)
    }

    #[instrument(skip(self))]
    async fn get_journey(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<Vec<JourneyOption>, TflError> {
        let url = self.endpoint(&["Journey", "JourneyResults", origin, "to", destination])?;
        let body = self.fetch(url).await?;
        let journeys = Self::parse_journeys_response(&body)?;

        debug!(count = journeys.len(), "Journeys found");
        Ok(journeys)
    }

    async fn is_healthy(&self) -> bool {
        let Ok(url) = self.endpoint(&HEALTH_PROBE_PATH) else {
            return false;
        };
        self.client
            .get(url)
            .query(&self.credential_params())
            .send()
            .await
            .is_ok_and(|r| r.status().is_success())
    }
}

// --- Raw API response types for deserialization ---

#[derive(Debug, Deserialize)]
struct RawSearchResponse {
    #[serde(default)]
    matches: Vec<RawMatch>,
}

#[derive(Debug, Deserialize)]
struct RawMatch {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArrival {
    line_id: String,
    destination_name: String,
    time_to_station: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLine {
    name: String,
    #[serde(default)]
    line_statuses: Vec<RawLineStatus>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLineStatus {
    status_severity_description: String,
}

#[derive(Debug, Deserialize)]
struct RawJourneyResults {
    #[serde(default)]
    journeys: Vec<RawJourney>,
}

#[derive(Debug, Deserialize)]
struct RawJourney {
    duration: u32,
    legs: Vec<RawLeg>,
}

#[derive(Debug, Deserialize)]
struct RawLeg {
    instruction: RawInstruction,
}

#[derive(Debug, Deserialize)]
struct RawInstruction {
    summary: String,
}
