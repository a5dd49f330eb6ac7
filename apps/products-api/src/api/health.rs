//! Readiness endpoint

use axum::{
    Json, Router,
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
};
use axum_helpers::{HealthCheckFuture, run_health_checks};
use database::postgres::check_health_detailed;
use serde_json::json;

use crate::state::AppState;

/// Database probe; the body also carries its round-trip time.
async fn ready(State(state): State<AppState>) -> Response {
    let status = check_health_detailed(&state.db).await;
    let latency_ms = status.response_time_ms;

    let checks: Vec<(&str, HealthCheckFuture<'_>)> =
        vec![("database", Box::pin(async move { status.into_result() }))];

    let (code, Json(mut body)) = match run_health_checks(checks).await {
        Ok(ready) => ready,
        Err(not_ready) => not_ready,
    };
    body["databaseLatencyMs"] = json!(latency_ms);

    (code, Json(body)).into_response()
}

pub fn router(state: AppState) -> Router {
    Router::new().route("/ready", get(ready)).with_state(state)
}
