use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use crate::store::{RecordStore, SlotKey, StoreError};

/// Process-local record store for development and tests.
///
/// The write lock is held across the existence check and the insert, which
/// makes `put_if_absent` atomic within one process. Records are not shared
/// between instances and do not survive a restart.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    records: RwLock<BTreeMap<SlotKey, Value>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn get(&self, key: &SlotKey) -> Result<Option<Value>, StoreError> {
        Ok(self.records.read().await.get(key).cloned())
    }

    async fn put_if_absent(&self, key: &SlotKey, record: Value) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        match records.entry(key.clone()) {
            Entry::Occupied(_) => Err(StoreError::Conflict(key.clone())),
            Entry::Vacant(slot) => {
                debug!("Stored record for slot {}", key);
                slot.insert(record);
                Ok(())
            }
        }
    }

    async fn query_by_attribute(&self, attribute: &str, value: &Value) -> Result<Vec<Value>, StoreError> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|record| record.get(attribute) == Some(value))
            .cloned()
            .collect())
    }

    async fn scan_all(&self) -> Result<Vec<Value>, StoreError> {
        Ok(self.records.read().await.values().cloned().collect())
    }
}
