//! Request DTOs for the OCR cache API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

use crate::cache::MAX_KEY_LENGTH;

/// Request body for storing a recognition result (PUT /ocr)
#[derive(Debug, Clone, Deserialize)]
pub struct StoreRequest {
    /// Image hash the result belongs to
    pub hash: String,
    /// Recognized text
    pub text: String,
    /// Optional confidence in the 0-1 range
    #[serde(default)]
    pub confidence: Option<f64>,
}

impl StoreRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.hash.is_empty() {
            return Some("Hash cannot be empty".to_string());
        }
        if self.hash.len() > MAX_KEY_LENGTH {
            return Some(format!(
                "Hash exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            ));
        }
        if let Some(confidence) = self.confidence {
            if !(0.0..=1.0).contains(&confidence) {
                return Some("Confidence must be between 0 and 1".to_string());
            }
        }
        None
    }
}

/// Request body for deriving a cache key (POST /hash)
#[derive(Debug, Clone, Deserialize)]
pub struct HashRequest {
    /// Image content, typically base64 or a data URL
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(hash: &str, confidence: Option<f64>) -> StoreRequest {
        StoreRequest {
            hash: hash.to_string(),
            text: "text".to_string(),
            confidence,
        }
    }

    #[test]
    fn test_store_request_deserialize() {
        let json = r#"{"hash": "abc", "text": "hello"}"#;
        let req: StoreRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.hash, "abc");
        assert_eq!(req.text, "hello");
        assert!(req.confidence.is_none());
    }

    #[test]
    fn test_store_request_with_confidence() {
        let json = r#"{"hash": "abc", "text": "hello", "confidence": 0.87}"#;
        let req: StoreRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.confidence, Some(0.87));
    }

    #[test]
    fn test_validate() {
        assert!(request("abc", Some(0.5)).validate().is_none());
        assert!(request("abc", Some(0.0)).validate().is_none());
        assert!(request("abc", Some(1.0)).validate().is_none());
        assert!(request("", None).validate().is_some());
        assert!(request(&"x".repeat(MAX_KEY_LENGTH + 1), None).validate().is_some());
        assert!(request("abc", Some(1.5)).validate().is_some());
        assert!(request("abc", Some(-0.1)).validate().is_some());
        assert!(request("abc", Some(f64::NAN)).validate().is_some());
    }

    #[test]
    fn test_hash_request_deserialize() {
        let req: HashRequest = serde_json::from_str(r#"{"content": "data:image/png;base64,AAA"}"#).unwrap();
        assert_eq!(req.content, "data:image/png;base64,AAA");
    }
}
