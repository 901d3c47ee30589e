//! Flat and time-of-use energy pricing.

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// An hour-of-day range `[start_hour, end_hour)` with its own energy rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TouBlock {
    /// Inclusive start, fractional hour of day.
    pub start_hour: f64,
    /// Exclusive end, fractional hour of day.
    pub end_hour: f64,
    /// Energy rate inside the block (per kWh).
    pub rate_per_kwh: f64,
}

impl TouBlock {
    /// Whether `hour_of_day` falls inside this block.
    pub fn contains(&self, hour_of_day: f64) -> bool {
        self.start_hour <= hour_of_day && hour_of_day < self.end_hour
    }
}

/// Depot electricity tariff: energy rate(s) plus a demand charge on peak kW.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Tariff {
    /// Energy rate used when no TOU block applies (per kWh).
    pub flat_energy_rate_per_kwh: f64,
    /// Demand charge applied to the peak load (per kW).
    pub demand_charge_per_kw: f64,
    /// Time-of-use blocks, evaluated in configuration order.
    pub tou_blocks: Vec<TouBlock>,
}

impl Default for Tariff {
    /// Flat pricing; a `[tariff]` table without `tou_blocks` stays flat.
    fn default() -> Self {
        Self::flat(0.22, 14.0)
    }
}

impl Tariff {
    /// Depot tariff with a cheap night block and an expensive evening peak.
    pub fn depot_tou() -> Self {
        Self {
            tou_blocks: vec![
                TouBlock {
                    start_hour: 0.0,
                    end_hour: 7.0,
                    rate_per_kwh: 0.12,
                },
                TouBlock {
                    start_hour: 16.0,
                    end_hour: 21.0,
                    rate_per_kwh: 0.38,
                },
            ],
            ..Self::default()
        }
    }

    /// A tariff without time-of-use blocks.
    pub fn flat(energy_rate_per_kwh: f64, demand_charge_per_kw: f64) -> Self {
        Self {
            flat_energy_rate_per_kwh: energy_rate_per_kwh,
            demand_charge_per_kw,
            tou_blocks: Vec::new(),
        }
    }

    /// Energy rate applying at `ts`.
    ///
    /// Blocks are scanned in configuration order and the first one containing
    /// the fractional hour of day wins, so overlapping blocks resolve to the
    /// earlier entry. Falls back to the flat rate when nothing matches.
    pub fn rate_for(&self, ts: NaiveDateTime) -> f64 {
        if self.tou_blocks.is_empty() {
            return self.flat_energy_rate_per_kwh;
        }
        let hour_of_day = f64::from(ts.hour()) + f64::from(ts.minute()) / 60.0;
        self.tou_blocks
            .iter()
            .find(|block| block.contains(hour_of_day))
            .map_or(self.flat_energy_rate_per_kwh, |block| block.rate_per_kwh)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 2, 17)
            .and_then(|d| d.and_hms_opt(h, m, 0))
            .expect("valid timestamp")
    }

    fn block(start_hour: f64, end_hour: f64, rate_per_kwh: f64) -> TouBlock {
        TouBlock {
            start_hour,
            end_hour,
            rate_per_kwh,
        }
    }

    #[test]
    fn flat_tariff_ignores_time() {
        let tariff = Tariff::flat(0.3, 10.0);
        assert_eq!(tariff.rate_for(at(3, 0)), 0.3);
        assert_eq!(tariff.rate_for(at(19, 45)), 0.3);
    }

    #[test]
    fn tou_block_uses_fractional_hour() {
        let tariff = Tariff {
            tou_blocks: vec![block(13.5, 14.0, 0.5)],
            ..Tariff::flat(0.2, 0.0)
        };
        assert_eq!(tariff.rate_for(at(13, 15)), 0.2);
        assert_eq!(tariff.rate_for(at(13, 30)), 0.5);
        assert_eq!(tariff.rate_for(at(13, 59)), 0.5);
        // end is exclusive
        assert_eq!(tariff.rate_for(at(14, 0)), 0.2);
    }

    #[test]
    fn first_matching_block_wins_on_overlap() {
        let tariff = Tariff {
            tou_blocks: vec![block(16.0, 21.0, 0.4), block(18.0, 22.0, 0.9)],
            ..Tariff::flat(0.2, 0.0)
        };
        assert_eq!(tariff.rate_for(at(19, 0)), 0.4);
        assert_eq!(tariff.rate_for(at(21, 30)), 0.9);

        let reversed = Tariff {
            tou_blocks: vec![block(18.0, 22.0, 0.9), block(16.0, 21.0, 0.4)],
            ..Tariff::flat(0.2, 0.0)
        };
        assert_eq!(reversed.rate_for(at(19, 0)), 0.9);
    }

    #[test]
    fn unmatched_hour_falls_back_to_flat() {
        let tariff = Tariff::depot_tou();
        assert_eq!(tariff.rate_for(at(10, 0)), tariff.flat_energy_rate_per_kwh);
        assert_eq!(tariff.rate_for(at(2, 0)), 0.12);
    }

    #[test]
    fn default_tariff_has_no_tou_blocks() {
        let tariff = Tariff::default();
        assert!(tariff.tou_blocks.is_empty());
        assert_eq!(tariff.rate_for(at(18, 0)), 0.22);
    }
}
