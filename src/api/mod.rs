//! REST API over a finished depot run.
//!
//! Provides three GET endpoints:
//! - `/summary` cost and savings summary
//! - `/load/{name}` load curve of `baseline` or a scenario
//! - `/schedule/{name}` schedule entries of a scenario, optionally filtered
//!   with `?session_id=`

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tracing::info;

use crate::sim::compare::DepotRun;

pub use types::{ErrorResponse, LoadPoint, ScheduleQuery};

/// Immutable application state shared across all request handlers.
///
/// Constructed once after the run completes and wrapped in `Arc`; no locks
/// needed since all data is read-only.
pub struct AppState {
    /// Baseline and scenario results.
    pub run: DepotRun,
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/summary", get(handlers::get_summary))
        .route("/load/{name}", get(handlers::get_load))
        .route("/schedule/{name}", get(handlers::get_schedule))
        .with_state(state)
}

/// Binds to the given address and serves the API until the process exits.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
