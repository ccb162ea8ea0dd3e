//! Readiness endpoint

use axum::{Json, Router, extract::State, routing::get};
use axum_helpers::AppError;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
struct ReadyResponse {
    status: &'static str,
    mongodb: bool,
    response_time_ms: u64,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(readiness_check))
        .with_state(state)
}

/// 200 when MongoDB answers a ping, 503 otherwise
async fn readiness_check(State(state): State<AppState>) -> Result<Json<ReadyResponse>, AppError> {
    let health = database::mongodb::check_health_detailed(&state.mongo_client).await;

    if !health.healthy {
        return Err(AppError::ServiceUnavailable(format!(
            "MongoDB is unreachable: {}",
            health.message.unwrap_or_default()
        )));
    }

    Ok(Json(ReadyResponse {
        status: "ready",
        mongodb: true,
        response_time_ms: health.response_time_ms,
    }))
}
