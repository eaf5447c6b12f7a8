//! Response DTOs for the ops API
//!
//! Defines the structure of outgoing HTTP response bodies. Snapshot
//! payloads (stats, limiter status, optimization outcomes) serialize their
//! domain types directly; the DTOs here cover the mutation endpoints.

use serde::Serialize;

/// Response body for the cache get operation (GET /cache/:key)
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// The requested key
    pub key: String,
    /// The stored payload
    pub value: serde_json::Value,
}

impl GetResponse {
    /// Creates a new GetResponse
    pub fn new(key: impl Into<String>, value: serde_json::Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Response body for the cache set operation (PUT /cache)
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    /// Success message
    pub message: String,
    /// The key that was set
    pub key: String,
}

impl SetResponse {
    /// Creates a new SetResponse
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' set successfully", key),
            key,
        }
    }
}

/// Response body for the cache delete operation (DELETE /cache/:key)
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// The key the delete targeted
    pub key: String,
    /// Whether an entry was present and removed
    pub removed: bool,
}

impl DeleteResponse {
    /// Creates a new DeleteResponse
    pub fn new(key: impl Into<String>, removed: bool) -> Self {
        Self {
            key: key.into(),
            removed,
        }
    }
}

/// Response body for the cache clear operation (DELETE /cache)
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    /// Success message
    pub message: String,
}

impl ClearResponse {
    pub fn new() -> Self {
        Self {
            message: "Cache cleared".to_string(),
        }
    }
}

impl Default for ClearResponse {
    fn default() -> Self {
        Self::new()
    }
}

/// Response body for limiter registration (PUT /limiters/:name)
#[derive(Debug, Clone, Serialize)]
pub struct LimiterCreatedResponse {
    /// Success message
    pub message: String,
    /// The limiter that was registered
    pub name: String,
}

impl LimiterCreatedResponse {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            message: format!("Limiter '{}' registered", name),
            name,
        }
    }
}

/// Response body for a successful admission (POST /limiters/:name/acquire)
#[derive(Debug, Clone, Serialize)]
pub struct AcquireResponse {
    /// The limiter that admitted the call
    pub name: String,
    /// Admissions left in the current window after this one
    pub remaining: usize,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_response_serialize() {
        let resp = GetResponse::new("test_key", json!({"artist": "test_artist"}));
        let out = serde_json::to_string(&resp).unwrap();
        assert!(out.contains("test_key"));
        assert!(out.contains("test_artist"));
    }

    #[test]
    fn test_set_response_serialize() {
        let resp = SetResponse::new("my_key");
        let out = serde_json::to_string(&resp).unwrap();
        assert!(out.contains("my_key"));
        assert!(out.contains("successfully"));
    }

    #[test]
    fn test_delete_response_serialize() {
        let resp = DeleteResponse::new("deleted_key", true);
        let out = serde_json::to_value(&resp).unwrap();
        assert_eq!(out["key"], "deleted_key");
        assert_eq!(out["removed"], true);
    }

    #[test]
    fn test_limiter_created_response() {
        let resp = LimiterCreatedResponse::new("spotify");
        let out = serde_json::to_string(&resp).unwrap();
        assert!(out.contains("spotify"));
        assert!(out.contains("registered"));
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let out = serde_json::to_string(&resp).unwrap();
        assert!(out.contains("healthy"));
        assert!(out.contains("timestamp"));
    }
}
