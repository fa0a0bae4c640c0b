//! API Routes
//!
//! Configures the Axum router with all OCR cache endpoints.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_handler, hash_handler, health_handler, lookup_handler, stats_handler, store_handler,
    AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `POST /hash` - Derive a cache key from image content
/// - `PUT /ocr` - Store a recognition result
/// - `DELETE /ocr` - Clear the cache
/// - `GET /ocr/:hash` - Look up a cached result
/// - `GET /stats` - Get cache statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - Body limit: `state.max_body_bytes`, base64 images exceed axum's 2 MB default
/// - CORS: Allows any origin, the OCR client runs in a browser
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.max_body_bytes);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/hash", post(hash_handler))
        .route("/ocr", put(store_handler).delete(clear_handler))
        .route("/ocr/:hash", get(lookup_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(body_limit)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
