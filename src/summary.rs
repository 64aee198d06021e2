//! Usage summarizer.
//!
//! Reduces raw per-device readings into a [`UsageSummary`]: the reading
//! period, overall totals, and a per-room breakdown with the peak/off-peak
//! split and the five heaviest devices. The result is small enough to embed
//! in a prompt regardless of how many readings went in.
//!
//! Pure and synchronous; every call allocates only local state.

use indexmap::IndexMap;

use crate::models::{
    DeviceTotals, EnergyRecord, OverallTotals, Period, RoomSummary, Scope, UsageSummary,
};

/// Maximum number of devices listed per room.
pub const TOP_DEVICES_PER_ROOM: usize = 5;

// ---

#[derive(Default)]
struct DeviceAcc {
    kwh: f64,
    cost: f64,
}

#[derive(Default)]
struct RoomAcc {
    // ---
    total_kwh: f64,
    total_cost: f64,
    peak_kwh: f64,
    offpeak_kwh: f64,
    devices: IndexMap<String, DeviceAcc>,
}

impl RoomAcc {
    // ---
    fn add(&mut self, record: &EnergyRecord) {
        // ---
        self.total_kwh += record.energy_kwh;
        self.total_cost += record.cost;

        if record.is_business_hours {
            self.peak_kwh += record.energy_kwh;
        } else {
            self.offpeak_kwh += record.energy_kwh;
        }

        let device = self
            .devices
            .entry(record.device_name().to_string())
            .or_default();
        device.kwh += record.energy_kwh;
        device.cost += record.cost;
    }

    fn finish(self, room: String) -> RoomSummary {
        // ---
        // A zero-energy room divides by 1 so both shares come out as 0%.
        let denominator = if self.total_kwh == 0.0 {
            1.0
        } else {
            self.total_kwh
        };

        let mut top_devices: Vec<DeviceTotals> = self
            .devices
            .into_iter()
            .map(|(name, d)| DeviceTotals {
                name,
                kwh: d.kwh,
                cost: d.cost,
            })
            .collect();
        // Stable sort keeps first-seen order on ties.
        top_devices.sort_by(|a, b| b.kwh.total_cmp(&a.kwh));
        top_devices.truncate(TOP_DEVICES_PER_ROOM);

        RoomSummary {
            room,
            total_kwh: self.total_kwh,
            total_cost: self.total_cost,
            peak_share_percent: round1(self.peak_kwh / denominator * 100.0),
            offpeak_share_percent: round1(self.offpeak_kwh / denominator * 100.0),
            top_devices,
        }
    }
}

/// Build a usage summary from a slice of readings.
///
/// Empty input yields empty period strings, zero totals and no rooms.
pub fn summarize(records: &[EnergyRecord]) -> UsageSummary {
    // ---
    if records.is_empty() {
        return UsageSummary::default();
    }

    let mut overall = OverallTotals::default();
    let mut rooms: IndexMap<String, RoomAcc> = IndexMap::new();

    for record in records {
        overall.total_kwh += record.energy_kwh;
        overall.total_cost += record.cost;

        rooms
            .entry(record.room_name().to_string())
            .or_default()
            .add(record);
    }

    let rooms: Vec<RoomSummary> = rooms
        .into_iter()
        .map(|(name, acc)| acc.finish(name))
        .collect();

    tracing::debug!(
        records = records.len(),
        rooms = rooms.len(),
        "usage summary built"
    );

    UsageSummary {
        period: period_of(records),
        overall,
        rooms,
    }
}

/// Summarize only the readings selected by `scope`.
///
/// A single-room scope with a room name keeps readings whose normalized room
/// matches it. Without a room name every reading is kept.
pub fn summarize_scope(records: &[EnergyRecord], scope: Scope, room: Option<&str>) -> UsageSummary {
    // ---
    match (scope, room) {
        (Scope::SingleRoom, Some(room)) => {
            let selected: Vec<EnergyRecord> = records
                .iter()
                .filter(|r| r.room_name() == room)
                .cloned()
                .collect();
            summarize(&selected)
        }
        _ => summarize(records),
    }
}

/// Raw timestamps of the earliest and latest readings.
///
/// `min_by_key` keeps the first of equal minima and `max_by_key` the last of
/// equal maxima, matching a stable ascending sort. Readings whose timestamp
/// does not parse are left out; if none parse, the first and last readings
/// in input order are used.
fn period_of(records: &[EnergyRecord]) -> Period {
    // ---
    let dated: Vec<_> = records
        .iter()
        .filter_map(|r| r.instant().map(|instant| (instant, r)))
        .collect();

    let start = dated.iter().min_by_key(|(instant, _)| *instant).map(|(_, r)| *r);
    let end = dated.iter().max_by_key(|(instant, _)| *instant).map(|(_, r)| *r);

    let (start, end) = match (start, end) {
        (Some(start), Some(end)) => (Some(start), Some(end)),
        _ => (records.first(), records.last()),
    };

    Period {
        start: start.map(|r| r.timestamp.clone()).unwrap_or_default(),
        end: end.map(|r| r.timestamp.clone()).unwrap_or_default(),
    }
}

/// Round to one decimal place the way JavaScript's `toFixed(1)` does.
///
/// Decimal formatting rounds the exact binary value, so 1.15 (stored just
/// below) gives 1.1. Exact binary ties (x.25, x.75) round away from zero
/// instead of to even.
pub(crate) fn round1(value: f64) -> f64 {
    // ---
    let quarters = value * 4.0;
    if quarters.fract() == 0.0 && quarters % 2.0 != 0.0 {
        return (value * 10.0).round() / 10.0;
    }
    format!("{value:.1}").parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    fn at(hour: u32) -> String {
        format!("2025-03-26T{hour:02}:00:00Z")
    }

    fn record(device: &str, room: &str, kwh: f64, cost: f64, business: bool) -> EnergyRecord {
        // ---
        EnergyRecord {
            timestamp: at(12),
            device_name: Some(device.to_string()),
            room: Some(room.to_string()),
            energy_kwh: kwh,
            cost,
            is_business_hours: business,
        }
    }

    #[test]
    fn test_empty_input_yields_empty_summary() {
        // ---
        let summary = summarize(&[]);

        assert_eq!(summary.period.start, "");
        assert_eq!(summary.period.end, "");
        assert_eq!(summary.overall.total_kwh, 0.0);
        assert_eq!(summary.overall.total_cost, 0.0);
        assert!(summary.rooms.is_empty());
    }

    #[test]
    fn test_kitchen_scenario() {
        // ---
        let records = vec![
            record("Fridge", "Kitchen", 1.0, 0.2, false),
            record("Oven", "Kitchen", 2.0, 0.5, true),
        ];

        let summary = summarize(&records);
        assert_eq!(summary.rooms.len(), 1);

        let kitchen = &summary.rooms[0];
        assert_eq!(kitchen.room, "Kitchen");
        assert!((kitchen.total_kwh - 3.0).abs() < 1e-9);
        assert!((kitchen.total_cost - 0.7).abs() < 1e-9);
        assert_eq!(kitchen.peak_share_percent, 66.7);
        assert_eq!(kitchen.offpeak_share_percent, 33.3);

        let names: Vec<&str> = kitchen.top_devices.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Oven", "Fridge"]);
        assert_eq!(kitchen.top_devices[0].kwh, 2.0);
        assert_eq!(kitchen.top_devices[0].cost, 0.5);
    }

    #[test]
    fn test_room_totals_add_up_to_overall() {
        // ---
        let records = vec![
            record("Fridge", "Kitchen", 1.25, 0.2, false),
            record("TV", "Lounge", 0.4, 0.1, true),
            record("Lamp", "Lounge", 0.15, 0.03, false),
            record("Heater", "Bedroom", 3.3, 0.9, true),
            record("Oven", "Kitchen", 2.1, 0.5, true),
        ];

        let summary = summarize(&records);
        let room_sum: f64 = summary.rooms.iter().map(|r| r.total_kwh).sum();

        assert!((room_sum - summary.overall.total_kwh).abs() < 1e-9);
        assert!((summary.overall.total_kwh - 7.2).abs() < 1e-9);
    }

    #[test]
    fn test_rooms_keep_first_seen_order() {
        // ---
        let records = vec![
            record("A", "Office", 1.0, 0.1, true),
            record("B", "Hall", 1.0, 0.1, true),
            record("C", "Office", 1.0, 0.1, true),
            record("D", "Attic", 1.0, 0.1, true),
        ];

        let rooms: Vec<String> = summarize(&records).rooms.into_iter().map(|r| r.room).collect();
        assert_eq!(rooms, vec!["Office", "Hall", "Attic"]);
    }

    #[test]
    fn test_shares_sum_to_hundred() {
        // ---
        let records = vec![
            record("A", "Office", 0.7, 0.1, true),
            record("B", "Office", 1.9, 0.1, false),
            record("C", "Office", 0.35, 0.1, true),
        ];

        let office = &summarize(&records).rooms[0];
        let total = office.peak_share_percent + office.offpeak_share_percent;
        assert!((total - 100.0).abs() <= 0.1 + 1e-9);
    }

    #[test]
    fn test_zero_energy_room_has_zero_shares() {
        // ---
        let records = vec![
            record("Standby", "Garage", 0.0, 0.0, true),
            record("Charger", "Garage", 0.0, 0.0, false),
        ];

        let garage = &summarize(&records).rooms[0];
        assert_eq!(garage.peak_share_percent, 0.0);
        assert_eq!(garage.offpeak_share_percent, 0.0);
        assert!(!garage.peak_share_percent.is_nan());
    }

    #[test]
    fn test_top_devices_capped_and_sorted() {
        // ---
        let records: Vec<EnergyRecord> = (0..8)
            .map(|i| record(&format!("Device {i}"), "Lab", f64::from(i), 0.1, false))
            .collect();

        let lab = &summarize(&records).rooms[0];
        assert_eq!(lab.top_devices.len(), TOP_DEVICES_PER_ROOM);
        assert!(lab.top_devices.windows(2).all(|w| w[0].kwh >= w[1].kwh));
        assert_eq!(lab.top_devices[0].name, "Device 7");
    }

    #[test]
    fn test_device_ties_keep_insertion_order() {
        // ---
        let records = vec![
            record("Kettle", "Kitchen", 1.0, 0.1, false),
            record("Toaster", "Kitchen", 1.0, 0.1, false),
            record("Fridge", "Kitchen", 2.0, 0.1, false),
            record("Kettle", "Kitchen", 0.0, 0.0, false),
        ];

        let names: Vec<String> = summarize(&records).rooms[0]
            .top_devices
            .iter()
            .map(|d| d.name.clone())
            .collect();
        assert_eq!(names, vec!["Fridge", "Kettle", "Toaster"]);
    }

    #[test]
    fn test_missing_names_grouped_under_sentinels() {
        // ---
        let mut nameless = record("", "", 1.0, 0.1, false);
        nameless.device_name = None;
        let blank = record("", "", 2.0, 0.2, true);

        let summary = summarize(&[nameless, blank]);
        assert_eq!(summary.rooms.len(), 1);
        assert_eq!(summary.rooms[0].room, "Unknown room");
        assert_eq!(summary.rooms[0].top_devices.len(), 1);
        assert_eq!(summary.rooms[0].top_devices[0].name, "Unknown device");
        assert_eq!(summary.rooms[0].top_devices[0].kwh, 3.0);
    }

    #[test]
    fn test_period_spans_earliest_to_latest() {
        // ---
        let mut late = record("A", "Hall", 1.0, 0.1, false);
        late.timestamp = at(20);
        let mut early = record("B", "Hall", 1.0, 0.1, false);
        early.timestamp = at(3);
        let middle = record("C", "Hall", 1.0, 0.1, false);

        let period = summarize(&[late, early, middle]).period;
        assert_eq!(period.start, "2025-03-26T03:00:00Z");
        assert_eq!(period.end, "2025-03-26T20:00:00Z");
    }

    #[test]
    fn test_period_echoes_offset_and_naive_timestamps() {
        // ---
        // 12:00+02:00 is 10:00 UTC, so it precedes the naive 11:00.
        let mut offset = record("A", "Hall", 1.0, 0.1, false);
        offset.timestamp = "2025-03-26T12:00:00+02:00".to_string();
        let mut naive = record("B", "Hall", 1.0, 0.1, false);
        naive.timestamp = "2025-03-26T11:00:00".to_string();

        let period = summarize(&[naive, offset]).period;
        assert_eq!(period.start, "2025-03-26T12:00:00+02:00");
        assert_eq!(period.end, "2025-03-26T11:00:00");
    }

    #[test]
    fn test_period_skips_unparsable_timestamps() {
        // ---
        let mut garbled = record("A", "Hall", 1.0, 0.1, false);
        garbled.timestamp = "not a time".to_string();
        let mut dated = record("B", "Hall", 1.0, 0.1, false);
        dated.timestamp = at(7);

        let summary = summarize(&[garbled.clone(), dated]);
        assert_eq!(summary.period.start, "2025-03-26T07:00:00Z");
        assert_eq!(summary.period.end, "2025-03-26T07:00:00Z");
        assert_eq!(summary.overall.total_kwh, 2.0);

        let undated = summarize(&[garbled]).period;
        assert_eq!(undated.start, "not a time");
        assert_eq!(undated.end, "not a time");
    }

    #[test]
    fn test_single_room_scope_filters_records() {
        // ---
        let records = vec![
            record("Fridge", "Kitchen", 1.0, 0.2, false),
            record("TV", "Lounge", 4.0, 1.0, true),
        ];

        let kitchen = summarize_scope(&records, Scope::SingleRoom, Some("Kitchen"));
        assert_eq!(kitchen.rooms.len(), 1);
        assert_eq!(kitchen.overall.total_kwh, 1.0);

        let everything = summarize_scope(&records, Scope::AllRooms, Some("Kitchen"));
        assert_eq!(everything.rooms.len(), 2);

        let unknown = summarize_scope(&records, Scope::SingleRoom, Some("Attic"));
        assert!(unknown.rooms.is_empty());
        assert_eq!(unknown.period.start, "");
    }

    #[test]
    fn test_round1() {
        // ---
        assert_eq!(round1(66.666_666), 66.7);
        assert_eq!(round1(33.333_333), 33.3);
        assert_eq!(round1(0.0), 0.0);
    }

    #[test]
    fn test_round1_matches_to_fixed() {
        // ---
        assert_eq!(round1(1.15), 1.1);
        assert_eq!(round1(0.25), 0.3);
        assert_eq!(round1(2.75), 2.8);
        assert_eq!(round1(100.0), 100.0);
        assert_eq!(round1(12.35), 12.3);
    }
}
