//! Seeded synthetic depot sessions with an evening arrival peak.

use chrono::{NaiveDateTime, NaiveTime, TimeDelta};
use rand::distr::weighted::WeightedIndex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Gamma, Normal};
use thiserror::Error;
use tracing::info;

use crate::config::SyntheticConfig;
use crate::sim::types::ChargingSession;

/// Charger power levels a vehicle may report (kW).
pub const CHARGER_LEVELS_KW: [f64; 4] = [7.4, 11.0, 22.0, 30.0];

/// Relative frequency of each entry in [`CHARGER_LEVELS_KW`].
const CHARGER_LEVEL_WEIGHTS: [f64; 4] = [0.35, 0.30, 0.25, 0.10];

/// Size of the simulated fleet; vehicle ids are `V0001..=V0260`.
pub const FLEET_SIZE: u32 = 260;

/// Errors raised while generating synthetic sessions.
#[derive(Debug, Error)]
pub enum SynthError {
    /// The horizon is too short to place any arrival.
    #[error("synthetic horizon must be at least one hour")]
    EmptyHorizon,
    /// A sampling distribution rejected its parameters.
    #[error("invalid {name} distribution: {message}")]
    Distribution {
        /// Which quantity was being sampled.
        name: &'static str,
        /// Underlying error text.
        message: String,
    },
}

/// Generator parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthParams {
    /// Any timestamp on the generated day; arrivals are placed from its midnight.
    pub start: NaiveDateTime,
    /// Horizon length; no window extends past `midnight + horizon_hours`.
    pub horizon_hours: u32,
    /// Number of sessions.
    pub sessions: usize,
    /// Random seed.
    pub seed: u64,
}

impl SynthParams {
    /// Builds generator parameters from configuration.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if `synthetic.start` is malformed.
    pub fn from_config(
        cfg: &SyntheticConfig,
        horizon_hours: u32,
    ) -> Result<Self, crate::config::ConfigError> {
        Ok(Self {
            start: cfg.start_time()?,
            horizon_hours,
            sessions: cfg.sessions,
            seed: cfg.seed,
        })
    }
}

fn distribution_error(name: &'static str, err: impl std::fmt::Display) -> SynthError {
    SynthError::Distribution {
        name,
        message: err.to_string(),
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10_f64.powi(decimals);
    (value * scale).round() / scale
}

/// Generates a reproducible set of depot sessions.
///
/// Arrival hour ~ N(19, 2.5) truncated to a whole hour in `[0, 23]`, arrival
/// minute a multiple of five, window ~ N(6, 2) hours clipped to `[2, 10]`,
/// energy ~ Gamma(3, 10) clipped to `[10, 70]` kWh. Sessions are returned
/// sorted by arrival; ids follow generation order.
///
/// # Errors
///
/// Returns a `SynthError` if the horizon is empty.
pub fn generate_sessions(params: &SynthParams) -> Result<Vec<ChargingSession>, SynthError> {
    if params.horizon_hours == 0 {
        return Err(SynthError::EmptyHorizon);
    }

    let mut rng = StdRng::seed_from_u64(params.seed);
    let arrival_hour =
        Normal::<f64>::new(19.0, 2.5).map_err(|e| distribution_error("arrival", e))?;
    let window_hours =
        Normal::<f64>::new(6.0, 2.0).map_err(|e| distribution_error("window", e))?;
    let energy = Gamma::<f64>::new(3.0, 10.0).map_err(|e| distribution_error("energy", e))?;
    let level = WeightedIndex::new(CHARGER_LEVEL_WEIGHTS)
        .map_err(|e| distribution_error("charger level", e))?;

    let day_start = params.start.date().and_time(NaiveTime::MIN);
    let horizon_end = day_start + TimeDelta::hours(i64::from(params.horizon_hours));
    let last_hour = f64::from(params.horizon_hours.min(24) - 1);

    let mut sessions: Vec<ChargingSession> = (0..params.sessions)
        .map(|i| {
            let hour = arrival_hour.sample(&mut rng).clamp(0.0, last_hour) as i64;
            let minute = 5 * rng.random_range(0..12_i64);
            let earliest_start =
                day_start + TimeDelta::hours(hour) + TimeDelta::minutes(minute);

            let window = window_hours.sample(&mut rng).clamp(2.0, 10.0);
            let latest_end =
                (earliest_start + TimeDelta::seconds((window * 3600.0) as i64)).min(horizon_end);

            let energy_kwh = round_to(energy.sample(&mut rng).clamp(10.0, 70.0), 2);
            let max_kw = round_to(CHARGER_LEVELS_KW[level.sample(&mut rng)], 1);
            let vehicle = rng.random_range(1..=FLEET_SIZE);

            ChargingSession {
                session_id: format!("S{:04}", i + 1),
                vehicle_id: format!("V{vehicle:04}"),
                earliest_start,
                latest_end,
                energy_kwh,
                max_kw,
            }
        })
        .collect();

    sessions.sort_by_key(|s| s.earliest_start);
    info!(
        sessions = sessions.len(),
        seed = params.seed,
        start = %day_start,
        "synthetic sessions generated"
    );
    Ok(sessions)
}
