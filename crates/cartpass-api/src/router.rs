//! Route definitions for the CartPass HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.
//! The router receives `AppState` and passes it to all handlers via
//! Axum's `State` extractor.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let max_body = state.config.server.max_body_bytes as usize;

    let api_routes = Router::new()
        .merge(batch_routes())
        .merge(sticker_routes())
        .merge(activation_routes())
        .merge(public_routes())
        .merge(health_routes());

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(max_body))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Batch administration endpoints.
fn batch_routes() -> Router<AppState> {
    Router::new()
        .route("/batches", post(handlers::batches::generate_batch))
        .route("/batches", get(handlers::batches::list_batches))
        .route("/batches/{id}", get(handlers::batches::get_batch))
        .route("/batches/{id}", delete(handlers::batches::delete_batch))
        .route("/batches/{id}/cancel", post(handlers::batches::cancel_batch))
}

/// Officer- and admin-facing sticker endpoints.
fn sticker_routes() -> Router<AppState> {
    Router::new()
        .route("/stickers", get(handlers::stickers::search_stickers))
        .route("/stickers/activate", post(handlers::stickers::activate_sticker))
        .route("/stickers/{code}", get(handlers::stickers::get_sticker))
        .route(
            "/stickers/{code}/verify",
            get(handlers::stickers::officer_verify),
        )
        .route(
            "/stickers/{code}/verifications",
            get(handlers::stickers::verification_history),
        )
        .route(
            "/stickers/{code}/revoke",
            post(handlers::stickers::revoke_sticker),
        )
}

/// Receipt and reporting read paths.
fn activation_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/activations/{receipt_number}",
            get(handlers::activations::get_by_receipt),
        )
        .route(
            "/lgas/{id}/activations",
            get(handlers::activations::list_for_lga),
        )
        .route("/lgas/{id}/stats", get(handlers::activations::lga_stats))
}

/// Public endpoints (no authentication).
fn public_routes() -> Router<AppState> {
    Router::new().route("/verify", post(handlers::verification::public_verify))
}

/// Health endpoints.
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
