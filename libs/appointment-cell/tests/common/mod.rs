#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use mockall::mock;
use serde_json::Value;

use shared_database::{InMemoryRecordStore, RecordStore, SharedStore, SlotKey, StoreError};

mock! {
    pub Store {}

    #[async_trait]
    impl RecordStore for Store {
        async fn get(&self, key: &SlotKey) -> Result<Option<Value>, StoreError>;
        async fn put_if_absent(&self, key: &SlotKey, record: Value) -> Result<(), StoreError>;
        async fn query_by_attribute(&self, attribute: &str, value: &Value) -> Result<Vec<Value>, StoreError>;
        async fn scan_all(&self) -> Result<Vec<Value>, StoreError>;
    }
}

/// An in-memory store plus the same store behind the trait object the
/// services take.
pub fn memory_store() -> (Arc<InMemoryRecordStore>, SharedStore) {
    let store = Arc::new(InMemoryRecordStore::new());
    let shared: SharedStore = store.clone();
    (store, shared)
}

/// A store whose every operation fails as an unreachable backend would.
pub fn failing_store() -> SharedStore {
    let mut store = MockStore::new();
    store
        .expect_get()
        .returning(|_| Err(StoreError::Backend("connection refused".to_string())));
    store
        .expect_put_if_absent()
        .returning(|_, _| Err(StoreError::Backend("connection refused".to_string())));
    store
        .expect_query_by_attribute()
        .returning(|_, _| Err(StoreError::Backend("connection refused".to_string())));
    store
        .expect_scan_all()
        .returning(|| Err(StoreError::Backend("connection refused".to_string())));
    Arc::new(store)
}

/// A store that must not be touched at all.
pub fn untouched_store() -> SharedStore {
    let mut store = MockStore::new();
    store.expect_get().never();
    store.expect_put_if_absent().never();
    store.expect_query_by_attribute().never();
    store.expect_scan_all().never();
    Arc::new(store)
}
