//! Router assembly for the crafting HTTP API.
//!
//! [`build_router`] wires all handler functions to their routes with
//! CORS and tracing middleware layers.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Builds the complete axum router with all API routes.
///
/// Routes use axum 0.8 `/{param}` path syntax. The `/api/...` routes are
/// the paths existing game clients call and stay as aliases.
/// CORS is permissive (the game client is served from arbitrary origins).
/// TraceLayer provides request-level logging via tracing.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Combination index
        .route(
            "/combination",
            get(handlers::combinations::check_combination)
                .post(handlers::combinations::store_combination),
        )
        .route("/craftnode", get(handlers::craftnodes::check_craftnode))
        // Asset generation passthrough
        .route("/text-to-voxel", post(handlers::generation::generate))
        .route(
            "/text-to-voxel/{id}",
            get(handlers::generation::fetch_generated),
        )
        // Legacy client paths
        .route(
            "/api/check-combination",
            get(handlers::combinations::check_combination),
        )
        .route(
            "/api/check-craftnode",
            get(handlers::craftnodes::check_craftnode),
        )
        .route(
            "/api/store-combination",
            post(handlers::combinations::store_combination),
        )
        .route("/api/text-to-voxel", post(handlers::generation::generate))
        .route(
            "/api/text-to-voxel/{id}",
            get(handlers::generation::fetch_generated),
        )
        .route("/health", get(handlers::health::health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
