//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};

use depot_sim::sim::grid::TimeGrid;
use depot_sim::sim::types::ChargingSession;
use depot_sim::synth::{SynthParams, generate_sessions};

/// Timestamp on the fixture day (2026-02-17).
pub fn at(h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 2, 17)
        .and_then(|d| d.and_hms_opt(h, m, 0))
        .expect("valid timestamp")
}

/// A session with vehicle id derived from the session id.
pub fn session(
    id: &str,
    start: NaiveDateTime,
    end: NaiveDateTime,
    energy_kwh: f64,
    max_kw: f64,
) -> ChargingSession {
    ChargingSession {
        session_id: id.to_string(),
        vehicle_id: format!("V-{id}"),
        earliest_start: start,
        latest_end: end,
        energy_kwh,
        max_kw,
    }
}

/// 24 h of 15-minute bins from midnight of the fixture day.
pub fn day_grid() -> TimeGrid {
    TimeGrid::new(at(0, 0), 24, 15)
}

/// Reproducible synthetic fleet (seed 7) on the fixture day.
pub fn synthetic_fleet(sessions: usize) -> Vec<ChargingSession> {
    generate_sessions(&SynthParams {
        start: at(0, 0),
        horizon_hours: 24,
        sessions,
        seed: 7,
    })
    .expect("synthetic fleet")
}
