//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use super::AppState;
use super::types::{ErrorResponse, LoadPoint, ScheduleQuery};
use crate::sim::compare::Summary;
use crate::sim::types::ScheduleEntry;

type ApiError = (StatusCode, Json<ErrorResponse>);

fn not_found(message: String) -> ApiError {
    (StatusCode::NOT_FOUND, Json(ErrorResponse { error: message }))
}

/// Returns the cost and savings summary.
///
/// `GET /summary` → 200 + `Summary` JSON
pub async fn get_summary(State(state): State<Arc<AppState>>) -> Json<Summary> {
    Json(state.run.summary())
}

/// Returns the load curve of the baseline or of one scenario.
///
/// `GET /load/baseline` → 200 + `Vec<LoadPoint>` JSON
/// `GET /load/{scenario}` → 200, or 404 + `ErrorResponse` if unknown
pub async fn get_load(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<Vec<LoadPoint>>, ApiError> {
    let load = if name == "baseline" {
        &state.run.baseline.load
    } else {
        let scenario = state
            .run
            .scenario(&name)
            .ok_or_else(|| not_found(format!("unknown scenario \"{name}\"")))?;
        &scenario.schedule.load
    };
    Ok(Json(LoadPoint::from_curve(load)))
}

/// Returns the schedule entries of one scenario.
///
/// `GET /schedule/{scenario}` → 200 + `Vec<ScheduleEntry>` JSON
/// `GET /schedule/{scenario}?session_id=S0001` → entries of that session only
/// Unknown scenario → 404 + `ErrorResponse`
pub async fn get_schedule(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Query(query): Query<ScheduleQuery>,
) -> Result<Json<Vec<ScheduleEntry>>, ApiError> {
    let scenario = state
        .run
        .scenario(&name)
        .ok_or_else(|| not_found(format!("unknown scenario \"{name}\"")))?;

    let entries = match query.session_id.as_deref() {
        Some(id) => scenario.schedule.entries_for(id).cloned().collect(),
        None => scenario.schedule.entries.clone(),
    };
    Ok(Json(entries))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use chrono::{NaiveDate, NaiveDateTime};
    use tower::util::ServiceExt;

    use super::*;
    use crate::api::router;
    use crate::sim::compare::{ScenarioComparator, ScenarioSpec};
    use crate::sim::grid::TimeGrid;
    use crate::sim::tariff::Tariff;
    use crate::sim::types::ChargingSession;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 2, 17)
            .and_then(|d| d.and_hms_opt(h, m, 0))
            .expect("valid timestamp")
    }

    fn make_test_state() -> Arc<AppState> {
        let sessions: Vec<ChargingSession> = (1..=3)
            .map(|i| ChargingSession {
                session_id: format!("S{i:04}"),
                vehicle_id: format!("V{i:04}"),
                earliest_start: at(18, 0),
                latest_end: at(22, 0),
                energy_kwh: 15.0,
                max_kw: 11.0,
            })
            .collect();
        let grid = TimeGrid::new(at(0, 0), 24, 15);
        let tariff = Tariff::depot_tou();
        let specs = vec![ScenarioSpec {
            name: "expected".into(),
            depot_power_cap_kw: 22.0,
        }];
        let run = ScenarioComparator::new(&sessions, &grid, &tariff, 10).compare(&specs);
        Arc::new(AppState { run })
    }

    async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
        let app = router(make_test_state());
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn summary_returns_200() {
        let (status, json) = get_json("/summary").await;
        assert_eq!(status, StatusCode::OK);
        assert!(json["baseline"]["total_cost"].is_number());
        assert_eq!(json["scenarios"]["expected"]["depot_power_cap_kw"], 22.0);
    }

    #[tokio::test]
    async fn baseline_load_has_every_bin() {
        let (status, json) = get_json("/load/baseline").await;
        assert_eq!(status, StatusCode::OK);
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 96);
        assert_eq!(rows[72]["bin_start"], "2026-02-17T18:00:00");
        assert_eq!(rows[72]["kw"], 33.0);
    }

    #[tokio::test]
    async fn scenario_load_respects_cap() {
        let (status, json) = get_json("/load/expected").await;
        assert_eq!(status, StatusCode::OK);
        let peak = json
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|r| r["kw"].as_f64())
            .fold(0.0_f64, f64::max);
        assert!(peak <= 22.0 + 1e-9);
    }

    #[tokio::test]
    async fn schedule_filters_by_session() {
        let (status, json) = get_json("/schedule/expected?session_id=S0002").await;
        assert_eq!(status, StatusCode::OK);
        let rows = json.as_array().unwrap();
        assert!(!rows.is_empty());
        assert!(rows.iter().all(|r| r["session_id"] == "S0002"));
    }

    #[tokio::test]
    async fn unknown_scenario_returns_404() {
        for uri in ["/load/missing", "/schedule/missing", "/schedule/baseline"] {
            let (status, json) = get_json(uri).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
            assert!(json.get("error").is_some());
        }
    }
}
