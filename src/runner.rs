//! Config-driven depot run: session loading, grid construction, comparison.

use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::config::{ConfigError, DepotConfig};
use crate::io::sessions::{IngestError, read_sessions};
use crate::sim::compare::{DepotRun, ScenarioComparator};
use crate::sim::grid::TimeGrid;
use crate::sim::types::ChargingSession;
use crate::synth::{SynthError, SynthParams, generate_sessions};

/// Errors that stop a depot run before any simulation happens.
#[derive(Debug, Error)]
pub enum RunError {
    /// The configuration failed validation.
    #[error("invalid configuration ({} error(s))", .0.len())]
    InvalidConfig(Vec<ConfigError>),
    /// A single configuration field could not be interpreted.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The session file could not be read.
    #[error(transparent)]
    Ingest(#[from] IngestError),
    /// Synthetic sessions could not be generated.
    #[error(transparent)]
    Synth(#[from] SynthError),
    /// Nothing left to simulate after filtering.
    #[error("no valid charging sessions to simulate")]
    NoSessions,
}

/// Loads sessions from `path`, or generates them from `config.synthetic`.
///
/// # Errors
///
/// Returns a `RunError` if the file cannot be read or generation fails.
pub fn load_sessions(
    config: &DepotConfig,
    path: Option<&Path>,
) -> Result<Vec<ChargingSession>, RunError> {
    match path {
        Some(p) => Ok(read_sessions(p)?),
        None => {
            let params = SynthParams::from_config(&config.synthetic, config.horizon_hours)?;
            Ok(generate_sessions(&params)?)
        }
    }
}

/// Builds the grid from the day of the earliest arrival and compares the
/// baseline with every configured scenario.
///
/// # Errors
///
/// Returns [`RunError::InvalidConfig`] if `config` does not validate and
/// [`RunError::NoSessions`] if `sessions` is empty.
pub fn run_depot(config: &DepotConfig, sessions: &[ChargingSession]) -> Result<DepotRun, RunError> {
    let errors = config.validate();
    if !errors.is_empty() {
        return Err(RunError::InvalidConfig(errors));
    }

    let earliest = sessions
        .iter()
        .map(|s| s.earliest_start)
        .min()
        .ok_or(RunError::NoSessions)?;
    let grid = TimeGrid::starting_at_day_of(earliest, config.horizon_hours, config.time_bin_minutes);
    info!(
        start = %grid.start(),
        bins = grid.len(),
        bin_minutes = grid.bin_minutes(),
        "time grid built"
    );

    let specs = config.scenarios();
    let comparator = ScenarioComparator::new(
        sessions,
        &grid,
        &config.tariff,
        config.max_concurrent_chargers,
    );
    Ok(comparator.compare(&specs))
}
