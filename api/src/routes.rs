//! API route definitions

use axum::{http::HeaderValue, routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    let cors = build_cors(state.config.cors_origin.as_deref());

    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Geography
        .route("/api/states", get(handlers::geo::list_states))
        .route(
            "/api/states/:code/districts",
            get(handlers::geo::list_districts),
        )
        .route("/api/districts/:slug", get(handlers::geo::get_district))
        .route(
            "/api/districts/:slug/schools",
            get(handlers::geo::list_district_schools),
        )
        .route("/api/schools/:slug", get(handlers::geo::get_school))
        // Metrics
        .route(
            "/api/metrics/proficiency",
            get(handlers::metrics::get_proficiency),
        )
        .route("/api/metrics/sat", get(handlers::metrics::get_sat))
        .route(
            "/api/metrics/enrollment",
            get(handlers::metrics::get_enrollment),
        )
        // Layers
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// CORS restricted to the configured dashboard origin, open otherwise
fn build_cors(origin: Option<&str>) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match origin.and_then(|o| o.parse::<HeaderValue>().ok()) {
        Some(origin) => layer.allow_origin(origin),
        None => layer.allow_origin(Any),
    }
}
