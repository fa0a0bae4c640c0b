//! OCR Cache - Bounded cache for text recognition results
//!
//! Keys OCR output by image content hash, expires it after a TTL, evicts the
//! least recently accessed result at capacity and mirrors every change to a
//! durable local snapshot.

pub mod api;
pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod storage;
pub mod tasks;

pub use api::AppState;
pub use cache::{HashStrategy, OcrCache, OcrResult};
pub use config::Config;
pub use tasks::spawn_cleanup_task;
