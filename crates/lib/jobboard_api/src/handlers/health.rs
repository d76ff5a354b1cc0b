//! Liveness endpoint.

use axum::Json;
use axum::extract::State;
use tracing::warn;

use crate::AppState;
use crate::models::HealthResponse;

/// `GET /health`: always 200; `database` reports store reachability.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthResponse)),
    tag = "health"
)]
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match state.store.ping().await {
        Ok(()) => "connected",
        Err(e) => {
            warn!("store ping failed: {e}");
            "unavailable"
        }
    };

    Json(HealthResponse {
        status: "ok".into(),
        version: jobboard_core::version().into(),
        database: database.into(),
    })
}
