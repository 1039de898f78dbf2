//! Asset generation passthrough handlers.
//!
//! These do not touch the store and never take the service lock.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value;

use crate::error::ApiError;
use crate::generator::{AssetResponse, GeneratorError};
use crate::state::AppState;

/// Starts a text-to-voxel generation task.
///
/// `POST /text-to-voxel`
pub async fn generate(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let response = state.generator.generate(&body).await.inspect_err(log_failure)?;
    relay(response)
}

/// Fetches a generation task by id.
///
/// `GET /text-to-voxel/{id}`
pub async fn fetch_generated(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let response = state
        .generator
        .fetch_generated(&id)
        .await
        .inspect_err(log_failure)?;
    relay(response)
}

fn relay(response: AssetResponse) -> Result<(StatusCode, Json<Value>), ApiError> {
    let status = StatusCode::from_u16(response.status).map_err(|_| {
        ApiError::InternalError(format!("provider returned invalid status {}", response.status))
    })?;
    Ok((status, Json(response.body)))
}

fn log_failure(err: &GeneratorError) {
    tracing::warn!(error = %err, "asset provider request failed");
}
