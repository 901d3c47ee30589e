//! Charging-session CSV ingest.
//!
//! Expected header: `session_id,vehicle_id,earliest_start,latest_end,energy_kwh,max_kw`.

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::sim::types::ChargingSession;

/// Accepted timestamp layouts. `%.f` also matches a missing fraction.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Errors raised while reading a session file.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The file could not be opened.
    #[error("cannot read \"{}\": {source}", path.display())]
    Io {
        /// Offending path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The CSV structure or a numeric field could not be decoded.
    #[error("malformed session CSV: {0}")]
    Csv(#[from] csv::Error),
    /// A timestamp matched none of the accepted layouts.
    #[error("line {line}: invalid {column} \"{value}\"")]
    Timestamp {
        /// 1-based line in the input, header included.
        line: u64,
        /// Column name.
        column: &'static str,
        /// Raw cell content.
        value: String,
    },
}

#[derive(Debug, Deserialize)]
struct SessionRow {
    session_id: String,
    vehicle_id: String,
    earliest_start: String,
    latest_end: String,
    energy_kwh: f64,
    max_kw: f64,
}

/// Parses a naive timestamp in any of the accepted layouts.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

/// Reads sessions from a CSV file.
///
/// # Errors
///
/// Returns an `IngestError` if the file cannot be opened or a row is malformed.
pub fn read_sessions(path: &Path) -> Result<Vec<ChargingSession>, IngestError> {
    let file = File::open(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let sessions = parse_sessions(io::BufReader::new(file))?;
    info!(path = %path.display(), sessions = sessions.len(), "sessions loaded");
    Ok(sessions)
}

/// Parses sessions from CSV text.
///
/// Rows whose window is empty or inverted, whose energy is negative or not
/// finite, or whose `max_kw` is not positive are skipped with a warning.
///
/// # Errors
///
/// Returns an `IngestError` on the first row that cannot be decoded.
pub fn parse_sessions(reader: impl Read) -> Result<Vec<ChargingSession>, IngestError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();

    let mut sessions = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let line = record.position().map_or(0, csv::Position::line);
        let row: SessionRow = record.deserialize(Some(&headers))?;

        let earliest_start = timestamp(&row.earliest_start, line, "earliest_start")?;
        let latest_end = timestamp(&row.latest_end, line, "latest_end")?;

        if latest_end <= earliest_start {
            warn!(line, session_id = %row.session_id, "skipping session: latest_end <= earliest_start");
            continue;
        }
        if !(row.energy_kwh.is_finite() && row.energy_kwh >= 0.0) {
            warn!(line, session_id = %row.session_id, energy_kwh = row.energy_kwh, "skipping session: invalid energy");
            continue;
        }
        if !(row.max_kw.is_finite() && row.max_kw > 0.0) {
            warn!(line, session_id = %row.session_id, max_kw = row.max_kw, "skipping session: max_kw must be > 0");
            continue;
        }

        sessions.push(ChargingSession {
            session_id: row.session_id,
            vehicle_id: row.vehicle_id,
            earliest_start,
            latest_end,
            energy_kwh: row.energy_kwh,
            max_kw: row.max_kw,
        });
    }
    Ok(sessions)
}

fn timestamp(value: &str, line: u64, column: &'static str) -> Result<NaiveDateTime, IngestError> {
    parse_timestamp(value).ok_or_else(|| IngestError::Timestamp {
        line,
        column,
        value: value.to_string(),
    })
}
