//! Greedy capacity- and concurrency-constrained charging scheduler.
//!
//! Sessions are served one at a time, most constrained first. Each session
//! is spread over the least-loaded bins of its window that still have a free
//! charger and enough headroom under the depot cap. The result is a feasible
//! schedule, not an optimal one.

use tracing::{debug, warn};

use super::curve::{ChargerCountCurve, LoadCurve};
use super::grid::TimeGrid;
use super::types::{ChargingSession, ENERGY_EPSILON_KWH, ScheduleEntry, SessionOutcome};

/// Depot constraints applied by the greedy allocator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GreedyScheduler {
    /// Maximum total charging power in any bin (kW).
    pub depot_power_cap_kw: f64,
    /// Maximum number of sessions charging in the same bin.
    pub max_concurrent_chargers: u32,
}

/// Everything a greedy run produces.
#[derive(Debug, Clone)]
pub struct ScheduleResult {
    /// One entry per (session, bin) delivery, in allocation order.
    pub entries: Vec<ScheduleEntry>,
    /// Resulting depot load (kW per bin).
    pub load: LoadCurve,
    /// Active sessions per bin.
    pub chargers: ChargerCountCurve,
    /// Delivered vs requested energy per session, in input order.
    pub outcomes: Vec<SessionOutcome>,
}

impl GreedyScheduler {
    /// Creates a scheduler for the given depot cap and charger limit.
    pub fn new(depot_power_cap_kw: f64, max_concurrent_chargers: u32) -> Self {
        Self {
            depot_power_cap_kw,
            max_concurrent_chargers,
        }
    }

    /// Allocates energy for all sessions over `grid`.
    ///
    /// Sessions are visited in [`priority_order`]. For each one the feasible
    /// bins are rescanned after every delivery; when none remain, the rest of
    /// its energy is left undelivered and shows up as a shortfall in
    /// [`ScheduleResult::outcomes`].
    pub fn schedule(&self, sessions: &[ChargingSession], grid: &TimeGrid) -> ScheduleResult {
        let bin_hours = grid.bin_hours();
        let mut load = LoadCurve::zeros(grid);
        let mut chargers = ChargerCountCurve::zeros(grid);
        let mut entries = Vec::new();
        let mut delivered = vec![0.0_f64; sessions.len()];

        for idx in priority_order(sessions, grid) {
            let session = &sessions[idx];
            let mut candidates: Vec<usize> = grid
                .bins_within(session.earliest_start, session.latest_end)
                .collect();
            let mut remaining_kwh = session.energy_kwh;

            while remaining_kwh > ENERGY_EPSILON_KWH && !candidates.is_empty() {
                let Some(pos) = self.pick_bin(&candidates, &load, &chargers, session.max_kw) else {
                    break;
                };
                let bin = candidates.remove(pos);

                let deliver_kwh = remaining_kwh.min(session.max_kw * bin_hours);
                let used_kw = deliver_kwh / bin_hours;
                load.add_kw(bin, used_kw);
                chargers.increment(bin);
                entries.push(ScheduleEntry {
                    session_id: session.session_id.clone(),
                    vehicle_id: session.vehicle_id.clone(),
                    bin_start: grid.bin_start(bin),
                    kw: used_kw,
                    kwh: deliver_kwh,
                });
                remaining_kwh -= deliver_kwh;
            }

            delivered[idx] = session.energy_kwh - remaining_kwh;
            if remaining_kwh > ENERGY_EPSILON_KWH {
                debug!(
                    session_id = %session.session_id,
                    unserved_kwh = remaining_kwh,
                    "no feasible bin left"
                );
            }
        }

        let outcomes: Vec<SessionOutcome> = sessions
            .iter()
            .zip(&delivered)
            .map(|(s, &kwh)| SessionOutcome::new(s, kwh))
            .collect();

        let unserved = outcomes.iter().filter(|o| !o.is_fully_served()).count();
        if unserved > 0 {
            warn!(
                cap_kw = self.depot_power_cap_kw,
                sessions = unserved,
                "sessions not fully served under depot constraints"
            );
        }

        ScheduleResult {
            entries,
            load,
            chargers,
            outcomes,
        }
    }

    /// Position in `candidates` of the bin to charge in next, if any is feasible.
    ///
    /// A bin is feasible when it has a free charger and adding the session's
    /// full `max_kw` stays within the cap. Among feasible bins the one with
    /// the lowest resulting load wins, then the lowest current load, then the
    /// earliest bin.
    fn pick_bin(
        &self,
        candidates: &[usize],
        load: &LoadCurve,
        chargers: &ChargerCountCurve,
        max_kw: f64,
    ) -> Option<usize> {
        candidates
            .iter()
            .enumerate()
            .filter(|&(_, &bin)| {
                chargers.count(bin) < self.max_concurrent_chargers
                    && load.kw(bin) + max_kw <= self.depot_power_cap_kw
            })
            .min_by(|&(_, &a), &(_, &b)| {
                let (load_a, load_b) = (load.kw(a), load.kw(b));
                (load_a + max_kw)
                    .total_cmp(&(load_b + max_kw))
                    .then_with(|| load_a.total_cmp(&load_b))
            })
            .map(|(pos, _)| pos)
    }
}

/// Share of a session's own maximum deliverable energy that it actually needs.
///
/// `energy_kwh / (max_kw * window_bins * bin_hours)` where `window_bins` is
/// the window length rounded up to whole bins, at least one.
pub fn tightness(session: &ChargingSession, grid: &TimeGrid) -> f64 {
    let bin_seconds = f64::from(grid.bin_minutes()) * 60.0;
    let window_bins = (session.window_seconds() as f64 / bin_seconds).ceil().max(1.0);
    session.energy_kwh / (session.max_kw * window_bins * grid.bin_hours())
}

/// Indices of `sessions` in scheduling order.
///
/// Tightest first; equal tightness goes to the earlier arrival, and any
/// remaining tie keeps input order.
pub fn priority_order(sessions: &[ChargingSession], grid: &TimeGrid) -> Vec<usize> {
    let keys: Vec<f64> = sessions.iter().map(|s| tightness(s, grid)).collect();
    let mut order: Vec<usize> = (0..sessions.len()).collect();
    order.sort_by(|&a, &b| {
        keys[b]
            .total_cmp(&keys[a])
            .then_with(|| sessions[a].earliest_start.cmp(&sessions[b].earliest_start))
    });
    order
}

/// Returns `true` when no bin exceeds either depot constraint.
///
/// `tolerance_kw` absorbs floating-point residue on the cap check.
pub fn respects_constraints(
    result: &ScheduleResult,
    scheduler: &GreedyScheduler,
    tolerance_kw: f64,
) -> bool {
    let cap_ok = result
        .load
        .values()
        .iter()
        .all(|&kw| kw <= scheduler.depot_power_cap_kw + tolerance_kw);
    let chargers_ok = result
        .chargers
        .values()
        .iter()
        .all(|&n| n <= scheduler.max_concurrent_chargers);
    cap_ok && chargers_ok
}

impl ScheduleResult {
    /// Entries belonging to one session, in allocation order.
    pub fn entries_for<'a>(&'a self, session_id: &'a str) -> impl Iterator<Item = &'a ScheduleEntry> {
        self.entries.iter().filter(move |e| e.session_id == session_id)
    }

    /// Total energy delivered across all sessions (kWh).
    pub fn delivered_kwh(&self) -> f64 {
        self.entries.iter().map(|e| e.kwh).sum()
    }

    /// Sessions that did not receive their full request.
    pub fn underserved(&self) -> impl Iterator<Item = &SessionOutcome> {
        self.outcomes.iter().filter(|o| !o.is_fully_served())
    }
}
