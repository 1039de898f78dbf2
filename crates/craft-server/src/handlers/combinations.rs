//! Combination lookup and store handlers.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::error::ApiError;
use crate::schema::combinations::{
    CombinationQuery, StoreCombinationRequest, StoreCombinationResponse,
};
use crate::schema::common::LookupResponse;
use crate::service::StoreStatus;
use crate::state::AppState;

/// Looks up the craftnode an unordered pair produces.
///
/// `GET /combination?str1=&str2=`
pub async fn check_combination(
    State(state): State<AppState>,
    Query(query): Query<CombinationQuery>,
) -> Result<Json<LookupResponse>, ApiError> {
    let service = state.service.lock().await;
    let response = service.check_combination(&query.str1, &query.str2)?;
    Ok(Json(response))
}

/// Records a newly played combination.
///
/// `POST /combination`
///
/// 201 when a row was written, 200 when the pair was already recorded.
pub async fn store_combination(
    State(state): State<AppState>,
    Json(req): Json<StoreCombinationRequest>,
) -> Result<(StatusCode, Json<StoreCombinationResponse>), ApiError> {
    let mut service = state.service.lock().await;
    let (status, response) = service.store_combination(req)?;
    let code = match status {
        StoreStatus::Created => StatusCode::CREATED,
        StoreStatus::AlreadyRecorded => StatusCode::OK,
    };
    Ok((code, Json(response)))
}
