//! API response and query types.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::sim::curve::LoadCurve;

/// One bin of a load curve, named like the load-curve CSV columns.
#[derive(Debug, Serialize)]
pub struct LoadPoint {
    /// Bin start.
    pub bin_start: NaiveDateTime,
    /// Average load over the bin (kW).
    pub kw: f64,
}

impl LoadPoint {
    /// Converts a whole curve into response rows.
    pub fn from_curve(load: &LoadCurve) -> Vec<Self> {
        load.iter()
            .map(|(bin_start, kw)| Self { bin_start, kw })
            .collect()
    }
}

/// Optional filter for the schedule endpoint.
#[derive(Debug, Deserialize)]
pub struct ScheduleQuery {
    /// Only return entries of this session.
    pub session_id: Option<String>,
}

/// Error response body for 4xx errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
