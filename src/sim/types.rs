//! Core simulation types: sessions, schedule entries, and delivery outcomes.

use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

/// Residual energy below which a session counts as fully served (kWh).
pub const ENERGY_EPSILON_KWH: f64 = 1e-6;

/// One vehicle's charging request at the depot.
///
/// The ingest layer guarantees `latest_end > earliest_start`,
/// `energy_kwh >= 0` and `max_kw > 0`; the core relies on that without
/// re-checking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChargingSession {
    /// Unique session identifier.
    pub session_id: String,
    /// Vehicle identifier (not necessarily unique across sessions).
    pub vehicle_id: String,
    /// Earliest time the vehicle can start charging.
    pub earliest_start: NaiveDateTime,
    /// Time the vehicle leaves (exclusive).
    pub latest_end: NaiveDateTime,
    /// Requested energy (kWh).
    pub energy_kwh: f64,
    /// Maximum charging power of this session (kW).
    pub max_kw: f64,
}

impl ChargingSession {
    /// Length of the charging window in seconds.
    pub fn window_seconds(&self) -> i64 {
        (self.latest_end - self.earliest_start).num_seconds()
    }
}

/// One delivery of one session in one bin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleEntry {
    /// Session receiving the energy.
    pub session_id: String,
    /// Vehicle of that session.
    pub vehicle_id: String,
    /// Start of the bin the delivery happens in.
    pub bin_start: NaiveDateTime,
    /// Average power over the bin (kW).
    pub kw: f64,
    /// Energy delivered in the bin (kWh).
    pub kwh: f64,
}

/// Requested versus delivered energy for one session after a simulation.
///
/// Unschedulable demand is not an error: it shows up here as a shortfall.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionOutcome {
    /// Session identifier.
    pub session_id: String,
    /// Vehicle identifier.
    pub vehicle_id: String,
    /// Energy the session asked for (kWh).
    pub requested_kwh: f64,
    /// Energy actually delivered (kWh).
    pub delivered_kwh: f64,
}

impl SessionOutcome {
    pub(crate) fn new(session: &ChargingSession, delivered_kwh: f64) -> Self {
        Self {
            session_id: session.session_id.clone(),
            vehicle_id: session.vehicle_id.clone(),
            requested_kwh: session.energy_kwh,
            delivered_kwh,
        }
    }

    /// Energy that was requested but never delivered (kWh, >= 0).
    pub fn shortfall_kwh(&self) -> f64 {
        (self.requested_kwh - self.delivered_kwh).max(0.0)
    }

    /// Whether the session received its full request within tolerance.
    pub fn is_fully_served(&self) -> bool {
        self.shortfall_kwh() <= ENERGY_EPSILON_KWH
    }
}

impl fmt::Display for SessionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}): {:.2}/{:.2} kWh",
            self.session_id, self.vehicle_id, self.delivered_kwh, self.requested_kwh
        )
    }
}

/// Sum of delivered energy over a set of outcomes (kWh).
pub fn total_delivered_kwh(outcomes: &[SessionOutcome]) -> f64 {
    outcomes.iter().map(|o| o.delivered_kwh).sum()
}

/// Sum of unserved energy over a set of outcomes (kWh).
pub fn total_shortfall_kwh(outcomes: &[SessionOutcome]) -> f64 {
    outcomes.iter().map(SessionOutcome::shortfall_kwh).sum()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn session(energy_kwh: f64) -> ChargingSession {
        let day = NaiveDate::from_ymd_opt(2026, 2, 17).expect("valid date");
        ChargingSession {
            session_id: "S0001".into(),
            vehicle_id: "V0001".into(),
            earliest_start: day.and_hms_opt(18, 0, 0).expect("valid time"),
            latest_end: day.and_hms_opt(22, 30, 0).expect("valid time"),
            energy_kwh,
            max_kw: 11.0,
        }
    }

    #[test]
    fn window_seconds_spans_start_to_end() {
        assert_eq!(session(10.0).window_seconds(), 4 * 3600 + 1800);
    }

    #[test]
    fn outcome_reports_shortfall() {
        let outcome = SessionOutcome::new(&session(20.0), 12.5);
        assert_eq!(outcome.shortfall_kwh(), 7.5);
        assert!(!outcome.is_fully_served());
    }

    #[test]
    fn residue_below_tolerance_counts_as_served() {
        let outcome = SessionOutcome::new(&session(20.0), 20.0 - 1e-9);
        assert!(outcome.is_fully_served());
    }

    #[test]
    fn totals_sum_over_outcomes() {
        let outcomes = vec![
            SessionOutcome::new(&session(10.0), 10.0),
            SessionOutcome::new(&session(10.0), 4.0),
        ];
        assert_eq!(total_delivered_kwh(&outcomes), 14.0);
        assert_eq!(total_shortfall_kwh(&outcomes), 6.0);
    }
}
