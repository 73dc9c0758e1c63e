//! Flight records and priority tiers

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Priority tier of a flight, governing its queue position
///
/// - `Scheduled`: normal service order, queued at the back
/// - `Emergency`: served first, queued at the front
/// - `Delayed`: tracked but not repositioned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlightStatus {
    Scheduled,
    Emergency,
    Delayed,
}

impl FlightStatus {
    /// Database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            FlightStatus::Scheduled => "scheduled",
            FlightStatus::Emergency => "emergency",
            FlightStatus::Delayed => "delayed",
        }
    }

    /// Parse from database string representation
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "scheduled" => Some(FlightStatus::Scheduled),
            "emergency" => Some(FlightStatus::Emergency),
            "delayed" => Some(FlightStatus::Delayed),
            _ => None,
        }
    }
}

/// A tracked flight
///
/// `code` is unique across the system and identifies the flight in queue
/// lookups; `guid` is the storage primary key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flight {
    pub guid: Uuid,
    pub code: String,
    pub status: FlightStatus,
    pub departure_time: NaiveTime,
    pub origin: String,
    pub destination: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            FlightStatus::Scheduled,
            FlightStatus::Emergency,
            FlightStatus::Delayed,
        ] {
            let parsed = FlightStatus::from_str(status.as_str()).unwrap();
            assert_eq!(status, parsed, "Round-trip failed for {:?}", status);
        }
    }

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert_eq!(
            FlightStatus::from_str("Emergency"),
            Some(FlightStatus::Emergency)
        );
        assert_eq!(FlightStatus::from_str("SCHEDULED"), Some(FlightStatus::Scheduled));
        assert_eq!(FlightStatus::from_str("boarding"), None);
    }
}
