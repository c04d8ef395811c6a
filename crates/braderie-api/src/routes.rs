//! API routes.

use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{middleware, Json, Router};
use tower_http::limit::RequestBodyLimitLayer;

use crate::handlers::{get_offer, health, list_offers, publish_offer, ready};
use crate::middleware::{cors_layer, request_id, request_logging};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    // Each method router carries the fallback too, so a known path with an
    // unhandled method answers 400 instead of 405.
    let offer_routes = Router::new()
        .route("/offer/publish", post(publish_offer).fallback(route_not_found))
        .route("/offers", get(list_offers).fallback(route_not_found))
        .route("/offer/:id", get(get_offer).fallback(route_not_found));

    let health_routes = Router::new()
        .route("/health", get(health).fallback(route_not_found))
        .route("/ready", get(ready).fallback(route_not_found));

    Router::new()
        .merge(offer_routes)
        .merge(health_routes)
        .fallback(route_not_found)
        // DefaultBodyLimit must be raised too, or its 2MB default wins.
        .layer(DefaultBodyLimit::max(state.config.max_body_size))
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(middleware::from_fn(request_id))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}

/// Any unmatched route answers 400 with a fixed body.
async fn route_not_found() -> (StatusCode, Json<&'static str>) {
    (StatusCode::BAD_REQUEST, Json("Route introuvable"))
}
