//! Redis-backed record store.
//!
//! The live tests need a running server and are ignored by default:
//!
//! ```text
//! REDIS_URL=redis://localhost:6379 cargo test -p shared-database -- --ignored
//! ```

use async_trait::async_trait;
use deadpool_redis::{Config, Connection, Pool, Runtime};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::store::{RecordStore, SlotKey, StoreError};

const SCAN_BATCH: usize = 200;

/// Record store on Redis. Each appointment is one string key
/// `{namespace}:{date}#{start_time}` holding the JSON record; `SET NX` gives
/// the atomic conditional write.
pub struct RedisRecordStore {
    pool: Pool,
    namespace: String,
}

impl RedisRecordStore {
    pub async fn new(redis_url: &str, namespace: &str) -> Result<Self, StoreError> {
        let cfg = Config::from_url(redis_url);
        let pool = cfg
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| StoreError::Backend(format!("Failed to create Redis pool: {}", e)))?;

        let store = Self {
            pool,
            namespace: namespace.to_string(),
        };

        // Test connection
        let mut conn = store.get_connection().await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        info!("Redis record store initialized for namespace '{}'", namespace);

        Ok(store)
    }

    async fn get_connection(&self) -> Result<Connection, StoreError> {
        self.pool
            .get()
            .await
            .map_err(|e| StoreError::Backend(format!("Failed to get Redis connection: {}", e)))
    }

    fn record_key(&self, key: &SlotKey) -> String {
        record_key(&self.namespace, key)
    }

    async fn scan_keys(&self, conn: &mut Connection, pattern: &str) -> Result<Vec<String>, StoreError> {
        let mut keys = Vec::new();
        let mut cursor: u64 = 0;

        loop {
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut *conn)
                .await?;

            keys.extend(batch);
            if next == 0 {
                break;
            }
            cursor = next;
        }

        debug!("SCAN {} matched {} keys", pattern, keys.len());
        Ok(keys)
    }

    async fn load(&self, conn: &mut Connection, keys: &[String]) -> Result<Vec<Value>, StoreError> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let payloads: Vec<Option<String>> = redis::cmd("MGET").arg(keys).query_async(&mut *conn).await?;

        // A key can expire or be removed between SCAN and MGET.
        payloads
            .into_iter()
            .flatten()
            .map(|payload| serde_json::from_str(&payload).map_err(StoreError::from))
            .collect()
    }

    async fn load_matching(&self, pattern: &str) -> Result<Vec<Value>, StoreError> {
        let mut conn = self.get_connection().await?;
        let keys = self.scan_keys(&mut conn, pattern).await?;
        self.load(&mut conn, &keys).await
    }
}

#[async_trait]
impl RecordStore for RedisRecordStore {
    async fn get(&self, key: &SlotKey) -> Result<Option<Value>, StoreError> {
        let mut conn = self.get_connection().await?;
        let payload: Option<String> = redis::cmd("GET")
            .arg(self.record_key(key))
            .query_async(&mut conn)
            .await?;

        payload
            .map(|p| serde_json::from_str(&p))
            .transpose()
            .map_err(StoreError::from)
    }

    async fn put_if_absent(&self, key: &SlotKey, record: Value) -> Result<(), StoreError> {
        let mut conn = self.get_connection().await?;
        let payload = serde_json::to_string(&record)?;

        let reply: Option<String> = redis::cmd("SET")
            .arg(self.record_key(key))
            .arg(payload)
            .arg("NX")
            .query_async(&mut conn)
            .await?;

        set_nx_outcome(reply, key)
    }

    async fn query_by_attribute(&self, attribute: &str, value: &Value) -> Result<Vec<Value>, StoreError> {
        // The date is part of the key, so a date filter is a key-pattern scan.
        if let ("date", Value::String(date)) = (attribute, value) {
            return self.load_matching(&date_pattern(&self.namespace, date)).await;
        }

        let records = self.scan_all().await?;
        Ok(records
            .into_iter()
            .filter(|record| record.get(attribute) == Some(value))
            .collect())
    }

    async fn scan_all(&self) -> Result<Vec<Value>, StoreError> {
        self.load_matching(&namespace_pattern(&self.namespace)).await
    }
}

fn record_key(namespace: &str, key: &SlotKey) -> String {
    format!("{}:{}#{}", namespace, key.date, key.start_time)
}

// `SET .. NX` replies `OK` when it wrote and nil when the key already existed.
fn set_nx_outcome(reply: Option<String>, key: &SlotKey) -> Result<(), StoreError> {
    match reply {
        Some(_) => Ok(()),
        None => {
            warn!("SET NX refused for occupied slot {}", key);
            Err(StoreError::Conflict(key.clone()))
        }
    }
}

fn date_pattern(namespace: &str, date: &str) -> String {
    format!("{}:{}#*", escape_glob(namespace), escape_glob(date))
}

fn namespace_pattern(namespace: &str) -> String {
    format!("{}:*", escape_glob(namespace))
}

/// Escapes the characters Redis treats specially in a MATCH pattern.
fn escape_glob(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
