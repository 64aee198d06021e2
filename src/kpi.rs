//! Headline figures for the dashboard cards.

use chrono::Timelike;
use serde::Serialize;

use crate::models::EnergyRecord;
use crate::summary::round1;

/// Share of cost treated as avoidable.
const AVOIDABLE_SHARE: f64 = 0.25;

/// Grid-average emissions, kg CO2 per kWh.
const CO2_KG_PER_KWH: f64 = 0.233;

/// Days covered by the dashboard window.
const WINDOW_DAYS: f64 = 30.0;

// ---

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardKpis {
    // ---
    pub total_energy_kwh: f64,
    pub total_cost: f64,
    pub avoidable_cost: f64,
    pub co2_emissions_kg: f64,
    /// Lowest hour-of-day total scaled to the window.
    pub baseload: f64,
    /// Highest hour-of-day total.
    pub peak_usage: f64,
    pub average_daily_usage: f64,
}

/// Compute the dashboard KPIs over a window of readings.
///
/// Hours are bucketed by the UTC hour of each timestamp; a reading whose
/// timestamp does not parse still counts towards the totals but lands in no
/// hour. Empty input yields all zeros.
pub fn build_kpis(records: &[EnergyRecord]) -> DashboardKpis {
    // ---
    if records.is_empty() {
        return DashboardKpis::default();
    }

    let mut hourly = [0.0_f64; 24];
    let mut total_kwh = 0.0;
    let mut total_cost = 0.0;

    for record in records {
        total_kwh += record.energy_kwh;
        total_cost += record.cost;
        if let Some(instant) = record.instant() {
            hourly[instant.hour() as usize] += record.energy_kwh;
        }
    }

    let min_hour = hourly.iter().copied().fold(f64::INFINITY, f64::min);
    let max_hour = hourly.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    DashboardKpis {
        total_energy_kwh: round1(total_kwh),
        total_cost: round2(total_cost),
        avoidable_cost: round2(total_cost * AVOIDABLE_SHARE),
        co2_emissions_kg: round1(total_kwh * CO2_KG_PER_KWH),
        baseload: round1(min_hour * WINDOW_DAYS),
        peak_usage: max_hour,
        average_daily_usage: round1(total_kwh / WINDOW_DAYS),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
