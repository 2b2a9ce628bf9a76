//! Route definitions for the ShareLink HTTP API.
//!
//! All routes are mounted under `/api`. The router receives `AppState`
//! and passes it to all handlers via Axum's `State` extractor.

use axum::{Router, routing::get};

use crate::handlers;
use crate::state::AppState;

/// Build the API router without cross-cutting layers.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(share_routes())
        .merge(public_share_routes())
        .merge(health_routes());

    Router::new().nest("/api", api_routes).with_state(state)
}

/// Owner share management (authenticated)
fn share_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/shares",
            get(handlers::share::list_shares).post(handlers::share::create_share),
        )
        .route(
            "/shares/{id}",
            get(handlers::share::get_share)
                .put(handlers::share::update_share)
                .delete(handlers::share::delete_share),
        )
        .route("/shares/{id}/info", get(handlers::share::get_share))
}

/// Public share access (no auth)
fn public_share_routes() -> Router<AppState> {
    Router::new().route(
        "/s/{token}",
        get(handlers::share::access_share).post(handlers::share::unlock_share),
    )
}

/// Health check
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
