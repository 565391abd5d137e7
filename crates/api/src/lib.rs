//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - The rate resolution endpoint (`GET /`)
//! - Health check endpoint
//! - Router assembly with tracing and CORS layers

pub mod routes;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use fxrates_core::rates::RateResolver;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Rate resolver owning the process-wide snapshot cache.
    pub resolver: Arc<RateResolver>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
