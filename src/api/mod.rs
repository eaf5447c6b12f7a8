//! API Module
//!
//! HTTP handlers and routing for the ops/debug REST surface over the
//! performance layer.
//!
//! # Endpoints
//! - `PUT /cache` - Store a key-value pair
//! - `GET /cache/:key` - Retrieve a value by key
//! - `DELETE /cache/:key` - Delete a key
//! - `DELETE /cache` - Clear all entries
//! - `PUT /limiters/:name` - Register or replace a rate limiter
//! - `GET /limiters/:name` - Read-only limiter status
//! - `POST /limiters/:name/acquire` - Consume one admission
//! - `GET /stats` - Full performance report
//! - `GET /recommendations` - Optimization recommendations
//! - `POST /optimize` - Run one memory-monitor pass
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
