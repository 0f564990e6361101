//! Gateway data models
//!
//! Simplified, client-friendly shapes produced from TfL unified API payloads.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Maximum number of journey options returned by a journey search
pub const MAX_JOURNEY_OPTIONS: usize = 3;

/// One stop point matched by a name search
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StopMatch {
    /// Human-readable stop name
    pub name: String,
    /// TfL stop point identifier (NaPTAN / hub id)
    pub id: String,
}

/// A live arrival prediction at a stop
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArrivalPrediction {
    /// Line identifier (e.g. "25")
    pub line: String,
    /// Destination shown on the vehicle
    pub destination: String,
    /// Whole minutes until arrival, rounded down
    pub arrival_mins: i64,
}

impl ArrivalPrediction {
    /// Build a prediction from the upstream seconds-to-station value
    ///
    /// Minutes are floored, so 59s is 0 minutes and 60s is 1 minute.
    #[must_use]
    pub fn from_seconds(line: String, destination: String, time_to_station_secs: i64) -> Self {
        Self {
            line,
            destination,
            arrival_mins: time_to_station_secs.div_euclid(60),
        }
    }
}

impl fmt::Display for ArrivalPrediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.arrival_mins {
            0 => write!(f, "{} to {} due", self.line, self.destination),
            1 => write!(f, "{} to {} in 1 min", self.line, self.destination),
            n => write!(f, "{} to {} in {n} mins", self.line, self.destination),
        }
    }
}

/// Current status of every line of one mode, keyed by line name
///
/// Lines keep the order TfL listed them in. A repeated line name keeps its
/// first position and takes the later status. Serializes as a flat JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineStatus(Vec<(String, String)>);

impl LineStatus {
    /// Status description for a line, if known
    #[must_use]
    pub fn get(&self, line: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(name, _)| name == line)
            .map(|(_, status)| status.as_str())
    }

    /// Set the status of a line, replacing any earlier entry in place
    pub fn insert(&mut self, line: String, status: String) {
        match self.0.iter_mut().find(|(name, _)| *name == line) {
            Some(entry) => entry.1 = status,
            None => self.0.push((line, status)),
        }
    }

    /// Number of lines
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no line reported a status
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(line, status)` pairs in upstream order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for LineStatus {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut status = Self::default();
        for (line, description) in iter {
            status.insert(line, description);
        }
        status
    }
}

impl Serialize for LineStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (line, status) in &self.0 {
            map.serialize_entry(line, status)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for LineStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LineStatusVisitor;

        impl<'de> Visitor<'de> for LineStatusVisitor {
            type Value = LineStatus;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of line name to status description")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<LineStatus, A::Error> {
                let mut status = LineStatus::default();
                while let Some((line, description)) = access.next_entry::<String, String>()? {
                    status.insert(line, description);
                }
                Ok(status)
            }
        }

        deserializer.deserialize_map(LineStatusVisitor)
    }
}

/// One ranked journey option between two places
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JourneyOption {
    /// 1-based rank in upstream order
    pub journey: u32,
    /// Total journey duration in minutes
    pub duration_mins: u32,
    /// Instruction summary of every leg, in travel order
    pub steps: Vec<String>,
}

impl JourneyOption {
    /// Format as a compact one-line summary
    #[must_use]
    pub fn format_summary(&self) -> String {
        format!(
            "#{} ({}min): {}",
            self.journey,
            self.duration_mins,
            self.steps.join(" → ")
        )
    }
}

impl fmt::Display for JourneyOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_summary())
    }
}
