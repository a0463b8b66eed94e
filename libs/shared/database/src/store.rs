use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Primary key of an appointment record: one record per (date, start_time).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SlotKey {
    pub date: String,
    pub start_time: String,
}

impl SlotKey {
    pub fn new(date: impl Into<String>, start_time: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            start_time: start_time.into(),
        }
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date, self.start_time)
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Record already exists for slot {0}")]
    Conflict(SlotKey),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Key-value persistence for appointment records.
///
/// Records are JSON documents carrying at least `date` and `start_time`.
/// `put_if_absent` is the only write and must be atomic in the backend: two
/// concurrent calls for the same key never both succeed.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn get(&self, key: &SlotKey) -> Result<Option<Value>, StoreError>;

    /// Writes `record` under `key` unless a record already exists there, in
    /// which case `StoreError::Conflict` is returned and nothing changes.
    async fn put_if_absent(&self, key: &SlotKey, record: Value) -> Result<(), StoreError>;

    async fn query_by_attribute(&self, attribute: &str, value: &Value) -> Result<Vec<Value>, StoreError>;

    async fn scan_all(&self) -> Result<Vec<Value>, StoreError>;
}

pub type SharedStore = Arc<dyn RecordStore>;

/// Renders an attribute value the way string-typed backends filter on it.
pub(crate) fn attribute_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn attribute_text_keeps_strings_unquoted() {
        assert_eq!(attribute_text(&json!("2025-03-01")), "2025-03-01");
        assert_eq!(attribute_text(&json!(2)), "2");
    }
}
