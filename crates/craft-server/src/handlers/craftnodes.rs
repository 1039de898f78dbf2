//! Craftnode lookup handler.

use axum::extract::{Query, State};
use axum::Json;

use crate::error::ApiError;
use crate::schema::common::LookupResponse;
use crate::schema::craftnodes::CraftnodeQuery;
use crate::state::AppState;

/// Looks up a craftnode by its label.
///
/// `GET /craftnode?text=`
pub async fn check_craftnode(
    State(state): State<AppState>,
    Query(query): Query<CraftnodeQuery>,
) -> Result<Json<LookupResponse>, ApiError> {
    let service = state.service.lock().await;
    Ok(Json(service.check_craftnode(&query.text)?))
}
