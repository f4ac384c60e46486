//! Unified API router for Learnloom
//!
//! Merges the module routers into a single axum `Router` with CORS and
//! request tracing.
//!
//! ## Endpoint Map
//!
//! | Path                               | Module  | Description              |
//! |------------------------------------|---------|--------------------------|
//! | `/health`                          | api     | Health probe             |
//! | `/functions/v1/generate-learning`  | service | Quiz / concept generation|

use crate::service::{generation_router, GenerationState};
use axum::{
    http::{header, HeaderName, Method},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the complete Learnloom HTTP application
pub fn build_app(generation_state: GenerationState, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .merge(generation_router(generation_state))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors(cors_origins))
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// =============================================================================
// CORS
// =============================================================================

fn build_cors(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("apikey"),
            HeaderName::from_static("x-client-info"),
        ]);

    if origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        let parsed: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        cors.allow_origin(parsed)
    }
}
