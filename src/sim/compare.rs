//! Baseline vs constrained-scenario comparison and savings.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::info;

use super::baseline::{BaselineResult, simulate_baseline};
use super::cost::{CostBreakdown, estimate_costs};
use super::greedy::{GreedyScheduler, ScheduleResult};
use super::grid::TimeGrid;
use super::tariff::Tariff;
use super::types::ChargingSession;

/// Savings of an optimised run relative to the baseline.
///
/// Percentages are reported as 0 when the baseline quantity is 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Savings {
    /// `(1 - optimised_peak / baseline_peak) * 100`.
    pub peak_kw_reduction_pct: f64,
    /// `baseline_total - optimised_total`.
    pub total_cost_savings: f64,
    /// `(1 - optimised_total / baseline_total) * 100`.
    pub total_cost_savings_pct: f64,
}

impl Savings {
    /// Computes savings of `optimized` against `baseline`.
    pub fn relative_to(baseline: &CostBreakdown, optimized: &CostBreakdown) -> Self {
        Self {
            peak_kw_reduction_pct: reduction_pct(baseline.peak_kw, optimized.peak_kw),
            total_cost_savings: baseline.total_cost - optimized.total_cost,
            total_cost_savings_pct: reduction_pct(baseline.total_cost, optimized.total_cost),
        }
    }
}

fn reduction_pct(baseline: f64, optimized: f64) -> f64 {
    if baseline == 0.0 {
        0.0
    } else {
        (1.0 - optimized / baseline) * 100.0
    }
}

/// A named depot power cap to evaluate.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioSpec {
    /// Scenario name, e.g. `"expected"`.
    pub name: String,
    /// Depot power cap for this scenario (kW).
    pub depot_power_cap_kw: f64,
}

/// Result of one constrained scenario.
#[derive(Debug, Clone)]
pub struct ScenarioRun {
    /// Scenario name.
    pub name: String,
    /// Cap the scheduler ran with (kW).
    pub depot_power_cap_kw: f64,
    /// Greedy schedule, load and per-session outcomes.
    pub schedule: ScheduleResult,
    /// Cost of the constrained load curve.
    pub costs: CostBreakdown,
    /// Savings versus the baseline.
    pub savings: Savings,
}

/// Baseline plus every scenario for one session set.
#[derive(Debug, Clone)]
pub struct DepotRun {
    /// Grid all curves are defined on.
    pub grid: TimeGrid,
    /// Number of sessions simulated.
    pub session_count: usize,
    /// Energy requested across all sessions (kWh).
    pub requested_kwh: f64,
    /// Mean per-session charger limit (kW); zero without sessions.
    pub mean_max_kw: f64,
    /// Unconstrained reference run.
    pub baseline: BaselineResult,
    /// Cost of the baseline load curve.
    pub baseline_costs: CostBreakdown,
    /// Constrained runs, in the order they were requested.
    pub scenarios: Vec<ScenarioRun>,
}

impl DepotRun {
    /// Looks up a scenario by name.
    pub fn scenario(&self, name: &str) -> Option<&ScenarioRun> {
        self.scenarios.iter().find(|s| s.name == name)
    }

    /// Serializable cost/savings summary.
    pub fn summary(&self) -> Summary {
        Summary {
            baseline: self.baseline_costs,
            scenarios: self
                .scenarios
                .iter()
                .map(|s| {
                    (
                        s.name.clone(),
                        ScenarioSummary {
                            depot_power_cap_kw: s.depot_power_cap_kw,
                            costs: s.costs,
                            savings: s.savings,
                        },
                    )
                })
                .collect(),
        }
    }
}

/// `{baseline, scenarios: {name: {depot_power_cap_kw, costs, savings}}}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Baseline cost breakdown.
    pub baseline: CostBreakdown,
    /// Per-scenario costs and savings keyed by name.
    pub scenarios: BTreeMap<String, ScenarioSummary>,
}

/// Summary of one scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScenarioSummary {
    /// Cap the scenario ran with (kW).
    pub depot_power_cap_kw: f64,
    /// Constrained cost breakdown.
    pub costs: CostBreakdown,
    /// Savings versus baseline.
    pub savings: Savings,
}

/// Runs the baseline and a greedy schedule per scenario over shared inputs.
///
/// Every run allocates its own accumulators, so scenarios do not influence
/// each other and may be evaluated in any order.
#[derive(Debug, Clone, Copy)]
pub struct ScenarioComparator<'a> {
    sessions: &'a [ChargingSession],
    grid: &'a TimeGrid,
    tariff: &'a Tariff,
    max_concurrent_chargers: u32,
}

impl<'a> ScenarioComparator<'a> {
    /// Creates a comparator over one session set.
    ///
    /// # Arguments
    ///
    /// * `sessions` - Validated charging sessions
    /// * `grid` - Simulation time grid
    /// * `tariff` - Tariff used to cost every load curve
    /// * `max_concurrent_chargers` - Charger limit shared by all scenarios
    pub fn new(
        sessions: &'a [ChargingSession],
        grid: &'a TimeGrid,
        tariff: &'a Tariff,
        max_concurrent_chargers: u32,
    ) -> Self {
        Self {
            sessions,
            grid,
            tariff,
            max_concurrent_chargers,
        }
    }

    /// Runs the unconstrained baseline and prices it.
    pub fn baseline(&self) -> (BaselineResult, CostBreakdown) {
        let baseline = simulate_baseline(self.sessions, self.grid);
        let costs = estimate_costs(&baseline.load, self.tariff);
        (baseline, costs)
    }

    /// Runs one scenario and compares it with `baseline_costs`.
    pub fn run_scenario(&self, spec: &ScenarioSpec, baseline_costs: &CostBreakdown) -> ScenarioRun {
        let scheduler = GreedyScheduler::new(spec.depot_power_cap_kw, self.max_concurrent_chargers);
        let schedule = scheduler.schedule(self.sessions, self.grid);
        let costs = estimate_costs(&schedule.load, self.tariff);
        let savings = Savings::relative_to(baseline_costs, &costs);

        info!(
            scenario = %spec.name,
            cap_kw = spec.depot_power_cap_kw,
            peak_kw = costs.peak_kw,
            total_cost = costs.total_cost,
            savings_pct = savings.total_cost_savings_pct,
            "scenario evaluated"
        );

        ScenarioRun {
            name: spec.name.clone(),
            depot_power_cap_kw: spec.depot_power_cap_kw,
            schedule,
            costs,
            savings,
        }
    }

    /// Runs the baseline and every scenario in `specs`.
    pub fn compare(&self, specs: &[ScenarioSpec]) -> DepotRun {
        let (baseline, baseline_costs) = self.baseline();
        info!(
            sessions = self.sessions.len(),
            bins = self.grid.len(),
            peak_kw = baseline_costs.peak_kw,
            total_cost = baseline_costs.total_cost,
            "baseline evaluated"
        );

        let scenarios = specs
            .iter()
            .map(|spec| self.run_scenario(spec, &baseline_costs))
            .collect();

        let requested_kwh = self.sessions.iter().map(|s| s.energy_kwh).sum();
        let mean_max_kw = if self.sessions.is_empty() {
            0.0
        } else {
            self.sessions.iter().map(|s| s.max_kw).sum::<f64>() / self.sessions.len() as f64
        };

        DepotRun {
            grid: *self.grid,
            session_count: self.sessions.len(),
            requested_kwh,
            mean_max_kw,
            baseline,
            baseline_costs,
            scenarios,
        }
    }
}
