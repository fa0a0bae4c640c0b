//! Background Tasks Module
//!
//! Contains background tasks that run periodically during service operation,
//! and the helper that moves cache mutations onto the blocking pool.
//!
//! # Tasks
//! - TTL Sweep: Purges expired OCR results at the configured interval

mod blocking;
mod cleanup;

pub use blocking::with_cache_blocking;
pub use cleanup::spawn_cleanup_task;
