//! Hashing Module
//!
//! Derives cache keys from image content.

use std::fmt;
use std::str::FromStr;

use sha2::{Digest, Sha256};

use crate::error::CacheError;

// == Hash Strategy ==
/// How cache keys are derived from image content.
///
/// Picked once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashStrategy {
    /// SHA-256, lowercase hex
    #[default]
    CryptoDigest,
    /// 32-bit `h * 31 + c` over UTF-16 code units, absolute value in decimal
    RollingChecksum,
    /// Content length in UTF-16 code units. Collides freely.
    LengthPlaceholder,
}

impl HashStrategy {
    // == Detect ==
    /// Selects the strongest strategy available in this runtime.
    pub fn detect() -> Self {
        HashStrategy::CryptoDigest
    }

    // == Generate Image Hash ==
    /// Computes the cache key for `content`. Never fails.
    pub fn generate_image_hash(&self, content: &str) -> String {
        match self {
            HashStrategy::CryptoDigest => {
                let mut hasher = Sha256::new();
                hasher.update(content.as_bytes());
                format!("{:x}", hasher.finalize())
            }
            HashStrategy::RollingChecksum => rolling_checksum(content).unsigned_abs().to_string(),
            HashStrategy::LengthPlaceholder => content.encode_utf16().count().to_string(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HashStrategy::CryptoDigest => "sha256",
            HashStrategy::RollingChecksum => "checksum",
            HashStrategy::LengthPlaceholder => "length",
        }
    }
}

impl fmt::Display for HashStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashStrategy {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sha256" | "digest" => Ok(HashStrategy::CryptoDigest),
            "checksum" => Ok(HashStrategy::RollingChecksum),
            "length" => Ok(HashStrategy::LengthPlaceholder),
            other => Err(CacheError::InvalidRequest(format!(
                "Unknown hash strategy: {}",
                other
            ))),
        }
    }
}

/// Classic `hash = hash * 31 + code_unit`, wrapping in signed 32-bit.
fn rolling_checksum(content: &str) -> i32 {
    content
        .encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(unit as i32))
}
