//! API Routes
//!
//! Configures the Axum router with all ops endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    acquire_handler, clear_handler, create_limiter_handler, delete_handler, get_handler,
    health_handler, limiter_status_handler, optimize_handler, recommendations_handler,
    set_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `PUT /cache` - Store a key-value pair
/// - `GET /cache/:key` - Retrieve a value by key
/// - `DELETE /cache/:key` - Delete a key
/// - `DELETE /cache` - Clear all entries
/// - `PUT /limiters/:name` - Register or replace a rate limiter
/// - `GET /limiters/:name` - Read-only limiter status
/// - `POST /limiters/:name/acquire` - Consume one admission
/// - `GET /stats` - Full performance report
/// - `GET /recommendations` - Optimization recommendations
/// - `POST /optimize` - Run one memory-monitor pass
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router with all endpoints
    Router::new()
        .route("/cache", put(set_handler).delete(clear_handler))
        .route("/cache/:key", get(get_handler).delete(delete_handler))
        .route(
            "/limiters/:name",
            put(create_limiter_handler).get(limiter_status_handler),
        )
        .route("/limiters/:name/acquire", post(acquire_handler))
        .route("/stats", get(stats_handler))
        .route("/recommendations", get(recommendations_handler))
        .route("/optimize", post(optimize_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
