//! Transport for London gateway
//!
//! Thin client over the [TfL unified API](https://api.tfl.gov.uk) that turns
//! stop search, live arrivals, line status and journey planning payloads into
//! small client-friendly shapes.
//!
//! # Architecture
//!
//! The crate follows a client-trait pattern consistent with other integration crates.
//! [`TransitGateway`] defines the four operations (plus a health probe),
//! implemented by [`TflGatewayClient`]. Every failure, including transport
//! failures, is returned as a [`TflError`] whose `Display` text is the message
//! shown to HTTP callers.
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_tfl::{TflConfig, TflGatewayClient, TransitGateway};
//!
//! let config = TflConfig::default();
//! let client = TflGatewayClient::new(&config)?;
//!
//! let arrivals = client.get_bus_arrivals("490008660N").await?;
//! for arrival in arrivals {
//!     println!("{arrival}");
//! }
//! ```

mod client;
mod config;
mod error;
mod models;

pub use client::{HEALTH_PROBE_PATH, TflGatewayClient, TransitGateway};
pub use config::TflConfig;
pub use error::TflError;
pub use models::{ArrivalPrediction, JourneyOption, LineStatus, MAX_JOURNEY_OPTIONS, StopMatch};
