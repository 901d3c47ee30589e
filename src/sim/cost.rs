//! Tariff cost of a load curve.

use serde::Serialize;

use super::curve::LoadCurve;
use super::tariff::Tariff;

/// Energy, demand and total cost of one load curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostBreakdown {
    /// Energy drawn over the horizon (kWh).
    pub total_kwh: f64,
    /// Highest bin load (kW), 0 for an empty curve.
    pub peak_kw: f64,
    /// Sum of per-bin energy times the applicable rate.
    pub energy_cost: f64,
    /// `peak_kw * demand_charge_per_kw`.
    pub demand_charge_cost: f64,
    /// `energy_cost + demand_charge_cost`.
    pub total_cost: f64,
}

/// Prices `load` under `tariff`.
///
/// Each bin contributes `kw * bin_hours` kWh at the rate for its start time.
/// The demand charge applies once to the peak bin.
pub fn estimate_costs(load: &LoadCurve, tariff: &Tariff) -> CostBreakdown {
    let bin_hours = load.grid().bin_hours();
    let mut total_kwh = 0.0;
    let mut energy_cost = 0.0;

    for (bin_start, kw) in load.iter() {
        let kwh = kw * bin_hours;
        total_kwh += kwh;
        energy_cost += kwh * tariff.rate_for(bin_start);
    }

    let peak_kw = load.peak_kw();
    let demand_charge_cost = peak_kw * tariff.demand_charge_per_kw;

    CostBreakdown {
        total_kwh,
        peak_kw,
        energy_cost,
        demand_charge_cost,
        total_cost: energy_cost + demand_charge_cost,
    }
}
