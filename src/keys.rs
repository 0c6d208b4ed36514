//! Key Derivation
//!
//! Deterministic fingerprints for quiz and grade requests, plus helpers that
//! store and fetch those artifacts through a [`KvStore`].
//!
//! The semantic key (`quiz:<topic>:<difficulty>:<count>:<seed>:<engine>` or
//! `grade:<question>:<answer>:<engine>`) is hashed with SHA-256 and stored as
//! lowercase hex, so the fingerprint is stable across processes and
//! snapshot reloads.

use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::cache::{CachedValue, KvStore};

// == Fingerprint ==
/// SHA-256 of `input` as 64 lowercase hex characters.
pub fn fingerprint(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    format!("{:x}", hasher.finalize())
}

// == Quiz Key ==
/// Parameters that fully determine a generated quiz.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QuizKey {
    pub topic: String,
    pub difficulty: String,
    pub question_count: u32,
    pub seed: i64,
    /// Producing engine; doubles as the source tag
    pub engine: String,
}

impl QuizKey {
    /// Unhashed key, `quiz:<topic>:<difficulty>:<count>:<seed>:<engine>`.
    pub fn semantic_key(&self) -> String {
        format!(
            "quiz:{}:{}:{}:{}:{}",
            self.topic, self.difficulty, self.question_count, self.seed, self.engine
        )
    }

    pub fn cache_key(&self) -> String {
        fingerprint(&self.semantic_key())
    }
}

// == Grade Key ==
/// Parameters that fully determine a grading result.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GradeKey {
    pub question_id: String,
    pub student_answer: String,
    /// Producing engine; doubles as the source tag
    pub engine: String,
}

impl GradeKey {
    /// Unhashed key, `grade:<question>:<answer>:<engine>`.
    pub fn semantic_key(&self) -> String {
        format!(
            "grade:{}:{}:{}",
            self.question_id, self.student_answer, self.engine
        )
    }

    pub fn cache_key(&self) -> String {
        fingerprint(&self.semantic_key())
    }
}

// == Store Helpers ==
/// Caches a generated quiz under its fingerprint, tagged with the engine.
pub fn cache_quiz(store: &KvStore, key: &QuizKey, quiz_json: impl Into<String>) -> usize {
    store.put(key.cache_key(), quiz_json, key.engine.as_str())
}

pub fn get_cached_quiz(store: &KvStore, key: &QuizKey) -> Option<CachedValue> {
    store.get(&key.cache_key())
}

/// Caches a grading result under its fingerprint, tagged with the engine.
pub fn cache_grade(store: &KvStore, key: &GradeKey, grade_json: impl Into<String>) -> usize {
    store.put(key.cache_key(), grade_json, key.engine.as_str())
}

pub fn get_cached_grade(store: &KvStore, key: &GradeKey) -> Option<CachedValue> {
    store.get(&key.cache_key())
}
