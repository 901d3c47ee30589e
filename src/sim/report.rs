//! Human-readable savings report for a depot run.

use std::fmt;

use super::compare::DepotRun;
use super::types::total_shortfall_kwh;

/// One constrained scenario as shown in the report.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioRow {
    /// Scenario name.
    pub name: String,
    /// Cap the scenario ran with (kW).
    pub cap_kw: f64,
    /// Constrained peak load (kW).
    pub peak_kw: f64,
    /// Peak reduction versus baseline (%).
    pub peak_reduction_pct: f64,
    /// Constrained total cost.
    pub total_cost: f64,
    /// Absolute cost savings versus baseline.
    pub savings: f64,
    /// Relative cost savings versus baseline (%).
    pub savings_pct: f64,
    /// Energy requested but not delivered (kWh).
    pub unserved_kwh: f64,
    /// Sessions that were not fully served.
    pub unserved_sessions: usize,
}

/// Aggregate figures for a complete depot run.
///
/// Built post-hoc from a [`DepotRun`] so printed numbers always match the
/// exported summary.
#[derive(Debug, Clone, PartialEq)]
pub struct SavingsReport {
    /// Number of sessions simulated.
    pub sessions: usize,
    /// Energy requested across all sessions (kWh).
    pub requested_kwh: f64,
    /// Average per-session charger limit (kW).
    pub avg_max_kw: f64,
    /// Baseline energy over the horizon (kWh).
    pub baseline_kwh: f64,
    /// Baseline peak load (kW).
    pub baseline_peak_kw: f64,
    /// Baseline energy cost.
    pub baseline_energy_cost: f64,
    /// Baseline demand charge.
    pub baseline_demand_cost: f64,
    /// Baseline total cost.
    pub baseline_total_cost: f64,
    /// Energy the baseline could not deliver inside the horizon (kWh).
    pub baseline_unserved_kwh: f64,
    /// One row per scenario, in run order.
    pub scenarios: Vec<ScenarioRow>,
}

impl SavingsReport {
    /// Collects report figures from `run`.
    pub fn from_run(run: &DepotRun) -> Self {
        let scenarios = run
            .scenarios
            .iter()
            .map(|s| ScenarioRow {
                name: s.name.clone(),
                cap_kw: s.depot_power_cap_kw,
                peak_kw: s.costs.peak_kw,
                peak_reduction_pct: s.savings.peak_kw_reduction_pct,
                total_cost: s.costs.total_cost,
                savings: s.savings.total_cost_savings,
                savings_pct: s.savings.total_cost_savings_pct,
                unserved_kwh: total_shortfall_kwh(&s.schedule.outcomes),
                unserved_sessions: s.schedule.underserved().count(),
            })
            .collect();

        let base = &run.baseline_costs;
        Self {
            sessions: run.session_count,
            requested_kwh: run.requested_kwh,
            avg_max_kw: run.mean_max_kw,
            baseline_kwh: base.total_kwh,
            baseline_peak_kw: base.peak_kw,
            baseline_energy_cost: base.energy_cost,
            baseline_demand_cost: base.demand_charge_cost,
            baseline_total_cost: base.total_cost,
            baseline_unserved_kwh: total_shortfall_kwh(&run.baseline.outcomes),
            scenarios,
        }
    }
}

impl fmt::Display for SavingsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Depot Savings Report ---")?;
        writeln!(f, "Sessions:              {}", self.sessions)?;
        writeln!(f, "Requested energy:      {:.2} kWh", self.requested_kwh)?;
        writeln!(f, "Avg max power:         {:.2} kW", self.avg_max_kw)?;
        writeln!(f, "Baseline energy:       {:.2} kWh", self.baseline_kwh)?;
        writeln!(f, "Baseline peak:         {:.2} kW", self.baseline_peak_kw)?;
        writeln!(
            f,
            "Baseline cost:         {:.2} (energy {:.2} + demand {:.2})",
            self.baseline_total_cost, self.baseline_energy_cost, self.baseline_demand_cost
        )?;
        write!(f, "Baseline unserved:     {:.2} kWh", self.baseline_unserved_kwh)?;

        for row in &self.scenarios {
            writeln!(f)?;
            writeln!(f, "[{}] cap {:.1} kW", row.name, row.cap_kw)?;
            writeln!(
                f,
                "  Peak:                {:.2} kW ({:.1}% reduction)",
                row.peak_kw, row.peak_reduction_pct
            )?;
            writeln!(f, "  Total cost:          {:.2}", row.total_cost)?;
            writeln!(
                f,
                "  Savings:             {:.2} ({:.1}%)",
                row.savings, row.savings_pct
            )?;
            write!(
                f,
                "  Unserved:            {:.2} kWh ({} sessions)",
                row.unserved_kwh, row.unserved_sessions
            )?;
        }
        Ok(())
    }
}
