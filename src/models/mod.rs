//! Request and Response models for the OCR cache API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{HashRequest, StoreRequest};
pub use responses::{
    ClearResponse, ErrorResponse, HashResponse, HealthResponse, LookupResponse, StatsResponse,
    StoreResponse,
};
