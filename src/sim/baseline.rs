//! Unconstrained "charge as soon as possible" reference simulation.

use tracing::debug;

use super::curve::LoadCurve;
use super::grid::TimeGrid;
use super::types::{ChargingSession, ENERGY_EPSILON_KWH, SessionOutcome};

/// Load curve and per-session delivery of a baseline run.
#[derive(Debug, Clone)]
pub struct BaselineResult {
    /// Aggregate depot load (kW per bin).
    pub load: LoadCurve,
    /// Delivered vs requested energy per session, in input order.
    pub outcomes: Vec<SessionOutcome>,
}

/// Simulates every session charging at its own `max_kw` from `earliest_start`.
///
/// Sessions are independent: there is no depot cap and no concurrency
/// limit, so each behaves as if it owned the depot. Bins of a session window
/// that fall outside `grid` are skipped and the energy they would have
/// carried is never delivered.
///
/// # Arguments
///
/// * `sessions` - Validated charging sessions
/// * `grid` - Simulation time grid
pub fn simulate_baseline(sessions: &[ChargingSession], grid: &TimeGrid) -> BaselineResult {
    let bin_hours = grid.bin_hours();
    let mut load = LoadCurve::zeros(grid);
    let mut outcomes = Vec::with_capacity(sessions.len());

    for session in sessions {
        let mut remaining_kwh = session.energy_kwh;
        let per_bin_kwh = session.max_kw * bin_hours;

        for index in grid.bins_within(session.earliest_start, session.latest_end) {
            if remaining_kwh <= ENERGY_EPSILON_KWH {
                break;
            }
            let deliver_kwh = remaining_kwh.min(per_bin_kwh);
            load.add_kw(index, deliver_kwh / bin_hours);
            remaining_kwh -= deliver_kwh;
        }

        let delivered_kwh = session.energy_kwh - remaining_kwh;
        if remaining_kwh > ENERGY_EPSILON_KWH {
            debug!(
                session_id = %session.session_id,
                undelivered_kwh = remaining_kwh,
                "baseline window truncated by grid"
            );
        }
        outcomes.push(SessionOutcome::new(session, delivered_kwh));
    }

    BaselineResult { load, outcomes }
}
