//! Data models for energy readings and the usage summary handed to the model.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

// ---

/// Sentinel used when a reading carries no device name.
pub const UNKNOWN_DEVICE: &str = "Unknown device";

/// Sentinel used when a reading carries no room name.
pub const UNKNOWN_ROOM: &str = "Unknown room";

/// Layouts accepted for timestamps that carry no UTC offset.
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// One observation of energy drawn by a single device at a single instant.
///
/// `cost` is computed upstream from a tariff and is aggregated as-is. The
/// timestamp is kept exactly as supplied; see [`EnergyRecord::instant`].
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyRecord {
    // ---
    pub timestamp: String,
    #[serde(default)]
    pub device_name: Option<String>,
    #[serde(default)]
    pub room: Option<String>,
    pub energy_kwh: f64,
    pub cost: f64,
    #[serde(default)]
    pub is_business_hours: bool,
}

impl EnergyRecord {
    // ---
    /// The timestamp as an instant, used only for ordering and bucketing.
    ///
    /// RFC 3339 is tried first; an ISO-8601 timestamp without an offset is
    /// read as UTC. `None` when neither parses.
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        // ---
        let raw = self.timestamp.trim();
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Some(ts.with_timezone(&Utc));
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
            .map(|naive| naive.and_utc())
    }

    /// Room name with the sentinel substituted for missing or empty values.
    pub fn room_name(&self) -> &str {
        // ---
        match self.room.as_deref() {
            Some(room) if !room.is_empty() => room,
            _ => UNKNOWN_ROOM,
        }
    }

    /// Device name with the sentinel substituted for missing or empty values.
    pub fn device_name(&self) -> &str {
        // ---
        match self.device_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => UNKNOWN_DEVICE,
        }
    }
}

/// Timestamps of the earliest and latest readings, as supplied. Both empty
/// when there were no readings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Period {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct OverallTotals {
    pub total_kwh: f64,
    pub total_cost: f64,
}

/// Summed consumption of one device within a room.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DeviceTotals {
    pub name: String,
    pub kwh: f64,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RoomSummary {
    // ---
    pub room: String,
    pub total_kwh: f64,
    pub total_cost: f64,
    pub peak_share_percent: f64,
    pub offpeak_share_percent: f64,
    /// At most five devices, highest kWh first.
    pub top_devices: Vec<DeviceTotals>,
}

/// Bounded, hierarchical snapshot of usage suitable for embedding in a prompt.
///
/// Built fresh per request and never mutated afterwards. Rooms appear in the
/// order they were first encountered in the input.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct UsageSummary {
    pub period: Period,
    pub overall: OverallTotals,
    pub rooms: Vec<RoomSummary>,
}

/// Framing of a request: the whole space or a single room.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    // ---
    AllRooms,
    /// Any token other than `all_rooms` is treated as a single room.
    #[default]
    #[serde(other)]
    SingleRoom,
}
