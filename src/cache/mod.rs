//! Cache Module
//!
//! Bounded OCR result cache with TTL expiration, last-access eviction and
//! content-hash keys.

mod entry;
mod eviction;
mod hashing;
mod stats;
mod store;


// Re-export public types
pub use entry::{CacheEntry, OcrResult};
pub use eviction::EvictionPolicy;
pub use hashing::HashStrategy;
pub use stats::CacheStats;
pub use store::{OcrCache, DEFAULT_MAX_ENTRIES, DEFAULT_TTL_MINUTES};

// == Public Constants ==
/// Maximum accepted hash length in bytes
pub const MAX_KEY_LENGTH: usize = 256;
