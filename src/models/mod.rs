//! Request and Response models for the ops API
//!
//! DTOs shared by the HTTP handlers: incoming request bodies and outgoing
//! response bodies for the mutation endpoints.

pub mod requests;
pub mod responses;

pub use requests::{LimiterRequest, SetRequest};
pub use responses::{
    AcquireResponse, ClearResponse, DeleteResponse, GetResponse, HealthResponse,
    LimiterCreatedResponse, SetResponse,
};
