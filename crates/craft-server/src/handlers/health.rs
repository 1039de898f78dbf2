//! Liveness and row-count probe.

use axum::extract::State;
use axum::Json;

use crate::error::ApiError;
use crate::schema::health::HealthResponse;
use crate::state::AppState;

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    let service = state.service.lock().await;
    Ok(Json(service.health()?))
}
