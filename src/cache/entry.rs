//! Cache Entry Module
//!
//! Defines a cached OCR result and the value handed back on a hit.

use serde::{Deserialize, Serialize};

// == Cache Entry ==
/// A recognized text stored under an image hash, with access metadata.
///
/// Serializes as `{"text", "confidence"?, "timestamp"}`, the durable
/// snapshot format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Recognized text
    pub text: String,
    /// Recognition confidence in the 0-1 range, if the engine reported one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    /// Last read or write (Unix milliseconds)
    #[serde(rename = "timestamp")]
    pub last_access: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry accessed at `now_ms`.
    pub fn new(text: String, confidence: Option<f64>, now_ms: u64) -> Self {
        Self {
            text,
            confidence,
            last_access: now_ms,
        }
    }

    // == Age ==
    /// Milliseconds since the last access. Saturates at 0 if the clock
    /// moved backwards.
    pub fn age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.last_access)
    }

    // == Touch ==
    /// Records an access at `now_ms`.
    pub fn touch(&mut self, now_ms: u64) {
        self.last_access = now_ms;
    }

    /// Copies out the caller-facing result.
    pub fn to_result(&self) -> OcrResult {
        OcrResult {
            text: self.text.clone(),
            confidence: self.confidence,
        }
    }
}

// == OCR Result ==
/// Value returned by a cache hit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OcrResult {
    pub text: String,
    pub confidence: Option<f64>,
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_creation() {
        let entry = CacheEntry::new("hello".to_string(), Some(0.9), 1_000);

        assert_eq!(entry.text, "hello");
        assert_eq!(entry.confidence, Some(0.9));
        assert_eq!(entry.last_access, 1_000);
    }

    #[test]
    fn test_age_and_touch() {
        let mut entry = CacheEntry::new("x".to_string(), None, 1_000);
        assert_eq!(entry.age_ms(1_500), 500);

        entry.touch(1_500);
        assert_eq!(entry.age_ms(1_500), 0);
    }

    #[test]
    fn test_age_saturates_when_clock_goes_back() {
        let entry = CacheEntry::new("x".to_string(), None, 1_000);
        assert_eq!(entry.age_ms(10), 0);
    }

    #[test]
    fn test_serialized_field_names() {
        let entry = CacheEntry::new("abc".to_string(), Some(0.5), 7);
        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json["text"], "abc");
        assert_eq!(json["confidence"], 0.5);
        assert_eq!(json["timestamp"], 7);
    }

    #[test]
    fn test_missing_confidence_is_omitted_and_accepted() {
        let entry = CacheEntry::new("abc".to_string(), None, 7);
        let json = serde_json::to_string(&entry).unwrap();
        assert!(!json.contains("confidence"));

        let parsed: CacheEntry = serde_json::from_str(r#"{"text":"abc","timestamp":7}"#).unwrap();
        assert_eq!(parsed, entry);
    }

    #[test]
    fn test_to_result() {
        let entry = CacheEntry::new("abc".to_string(), Some(0.25), 7);
        let result = entry.to_result();

        assert_eq!(result.text, "abc");
        assert_eq!(result.confidence, Some(0.25));
    }
}
