//! Request DTOs for the cache API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

use crate::keys::{GradeKey, QuizKey};

/// Request body for `PUT /entries/:key`
///
/// Empty values and empty source tags are legal.
#[derive(Debug, Clone, Deserialize)]
pub struct PutEntryRequest {
    /// The payload to store
    pub value: String,
    /// Namespace tag
    #[serde(default)]
    pub source: String,
}

/// Request body for `PUT /capacity`
#[derive(Debug, Clone, Deserialize)]
pub struct CapacityRequest {
    pub max_size_bytes: usize,
}

/// Request body for `POST /maintenance/expire`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExpireRequest {
    /// Overrides the configured expiry age
    #[serde(default)]
    pub max_age_secs: Option<u64>,
}

/// Request body for `POST /maintenance/trim`
#[derive(Debug, Clone, Deserialize)]
pub struct TrimRequest {
    pub max_entries: usize,
}

/// Request body for `PUT /quiz`
#[derive(Debug, Clone, Deserialize)]
pub struct CacheQuizRequest {
    #[serde(flatten)]
    pub key: QuizKey,
    /// Generated quiz document
    pub quiz: String,
}

impl CacheQuizRequest {
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        validate_quiz_key(&self.key)
    }
}

/// Request body for `PUT /grade`
#[derive(Debug, Clone, Deserialize)]
pub struct CacheGradeRequest {
    #[serde(flatten)]
    pub key: GradeKey,
    /// Grading result document
    pub grade: String,
}

impl CacheGradeRequest {
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        validate_grade_key(&self.key)
    }
}

/// Checks the fields a quiz fingerprint cannot do without.
pub fn validate_quiz_key(key: &QuizKey) -> Option<String> {
    if key.topic.is_empty() {
        return Some("Topic cannot be empty".to_string());
    }
    if key.engine.is_empty() {
        return Some("Engine cannot be empty".to_string());
    }
    None
}

/// Checks the fields a grade fingerprint cannot do without.
pub fn validate_grade_key(key: &GradeKey) -> Option<String> {
    if key.question_id.is_empty() {
        return Some("Question id cannot be empty".to_string());
    }
    if key.engine.is_empty() {
        return Some("Engine cannot be empty".to_string());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_entry_request_default_source() {
        let req: PutEntryRequest = serde_json::from_str(r#"{"value": "hello"}"#).unwrap();
        assert_eq!(req.value, "hello");
        assert_eq!(req.source, "");
    }

    #[test]
    fn test_expire_request_optional_age() {
        let req: ExpireRequest = serde_json::from_str("{}").unwrap();
        assert!(req.max_age_secs.is_none());

        let req: ExpireRequest = serde_json::from_str(r#"{"max_age_secs": 60}"#).unwrap();
        assert_eq!(req.max_age_secs, Some(60));
    }

    #[test]
    fn test_cache_quiz_request_flattens_key() {
        let json = r#"{"topic":"cells","difficulty":"easy","question_count":5,"seed":7,"engine":"rules","quiz":"{}"}"#;
        let req: CacheQuizRequest = serde_json::from_str(json).unwrap();

        assert_eq!(req.key.question_count, 5);
        assert_eq!(req.key.seed, 7);
        assert_eq!(req.quiz, "{}");
        assert!(req.validate().is_none());
    }

    #[test]
    fn test_cache_grade_request_requires_engine() {
        let json = r#"{"question_id":"q1","student_answer":"x","engine":"","grade":"{}"}"#;
        let req: CacheGradeRequest = serde_json::from_str(json).unwrap();
        assert!(req.validate().is_some());
    }
}
