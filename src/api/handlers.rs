//! API Handlers
//!
//! HTTP request handlers for each ops endpoint. The handlers are a thin
//! layer over the shared [`PerfService`]: they translate DTOs, map cache
//! absence to 404, and surface limiter rejections as 429.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::{PerfError, Result};
use crate::models::{
    AcquireResponse, ClearResponse, DeleteResponse, GetResponse, HealthResponse, LimiterRequest,
    LimiterCreatedResponse, SetRequest, SetResponse,
};
use crate::service::{OptimizeOutcome, PerfService, PerformanceReport, Recommendation};
use crate::limiter::LimiterStatus;

/// Payload type served by the ops surface.
pub type JsonValue = serde_json::Value;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Shared performance-layer handle
    pub service: PerfService<JsonValue>,
}

impl AppState {
    /// Creates a new AppState around an existing service handle.
    pub fn new(service: PerfService<JsonValue>) -> Self {
        Self { service }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new(PerfService::from_config(config))
    }
}

/// Handler for PUT /cache
///
/// Stores a key-value pair in the cache with optional TTL and priority.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    // Validate request
    if let Some(error_msg) = req.validate() {
        return Err(PerfError::InvalidRequest(error_msg));
    }

    let options = req.options();
    state.service.cache_set(&req.key, req.value, options).await?;

    Ok(Json(SetResponse::new(req.key)))
}

/// Handler for GET /cache/:key
///
/// Retrieves a value from the cache by key; absent or expired keys map
/// to 404.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    let value = state
        .service
        .cache_get(&key)
        .await
        .ok_or_else(|| PerfError::KeyNotFound(key.clone()))?;

    Ok(Json(GetResponse::new(key, value)))
}

/// Handler for DELETE /cache/:key
///
/// Deletes a key from the cache; deleting an absent key is not an error.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<DeleteResponse> {
    let removed = state.service.cache_delete(&key).await;
    Json(DeleteResponse::new(key, removed))
}

/// Handler for DELETE /cache
///
/// Clears every cache entry.
pub async fn clear_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    state.service.cache_clear().await;
    Json(ClearResponse::new())
}

/// Handler for PUT /limiters/:name
///
/// Registers or replaces a named rate limiter.
pub async fn create_limiter_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(req): Json<LimiterRequest>,
) -> Result<Json<LimiterCreatedResponse>> {
    state.service.create_limiter(&name, req.config()).await?;
    Ok(Json(LimiterCreatedResponse::new(name)))
}

/// Handler for GET /limiters/:name
///
/// Read-only limiter status; never consumes an admission.
pub async fn limiter_status_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<LimiterStatus>> {
    let status = state.service.limiter_status(&name).await?;
    Ok(Json(status))
}

/// Handler for POST /limiters/:name/acquire
///
/// Consumes one admission from the named limiter, or fails with 429 and a
/// retry-after when the window is exhausted.
pub async fn acquire_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<AcquireResponse>> {
    let decision = state.service.check_limiter(&name).await?;
    if !decision.allowed {
        return Err(PerfError::RateLimitExceeded {
            name,
            retry_after_ms: decision.retry_after_ms.unwrap_or(1),
        });
    }

    let status = state.service.limiter_status(&name).await?;
    Ok(Json(AcquireResponse {
        name,
        remaining: status.remaining,
    }))
}

/// Handler for GET /stats
///
/// Returns the full performance report.
pub async fn stats_handler(State(state): State<AppState>) -> Json<PerformanceReport> {
    Json(state.service.performance_report().await)
}

/// Handler for GET /recommendations
///
/// Returns the currently firing optimization recommendations.
pub async fn recommendations_handler(
    State(state): State<AppState>,
) -> Json<Vec<Recommendation>> {
    Json(state.service.recommendations().await)
}

/// Handler for POST /optimize
///
/// Runs one memory-monitor pass and reports what it reclaimed.
pub async fn optimize_handler(State(state): State<AppState>) -> Json<OptimizeOutcome> {
    Json(state.service.check_and_optimize().await)
}

/// Handler for GET /health
///
/// Returns health status of the service.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
