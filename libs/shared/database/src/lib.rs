pub mod memory;
pub mod redis_store;
pub mod store;
pub mod supabase;

use std::sync::Arc;

use tracing::info;

use shared_config::{AppConfig, StoreBackend};

pub use memory::InMemoryRecordStore;
pub use redis_store::RedisRecordStore;
pub use store::{RecordStore, SharedStore, SlotKey, StoreError};
pub use supabase::{SupabaseClient, SupabaseRecordStore};

/// Opens the record store selected by `config.store_backend`.
pub async fn connect(config: &AppConfig) -> Result<SharedStore, StoreError> {
    info!(
        "Opening {} record store for table '{}'",
        config.store_backend, config.appointments_table
    );

    let store: SharedStore = match config.store_backend {
        StoreBackend::Memory => Arc::new(InMemoryRecordStore::new()),
        StoreBackend::Redis => {
            let redis_url = config
                .redis_url
                .as_deref()
                .ok_or_else(|| StoreError::Backend("REDIS_URL is not configured".to_string()))?;
            Arc::new(RedisRecordStore::new(redis_url, &config.appointments_table).await?)
        }
        StoreBackend::Supabase => Arc::new(SupabaseRecordStore::new(config)),
    };

    Ok(store)
}
