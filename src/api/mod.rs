//! API Module
//!
//! HTTP handlers and routing for the OCR cache service.
//!
//! # Endpoints
//! - `POST /hash` - Derive a cache key from image content
//! - `PUT /ocr` - Store a recognition result
//! - `DELETE /ocr` - Clear the cache
//! - `GET /ocr/:hash` - Look up a cached result
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
