use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method, StatusCode,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, warn};
use urlencoding::encode;

use shared_config::AppConfig;

use crate::store::{attribute_text, RecordStore, SlotKey, StoreError};

/// Outcome of a PostgREST insert against a table with a primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Created,
    Duplicate,
}

pub struct SupabaseClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SupabaseClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.supabase_url.trim_end_matches('/').to_string(),
            api_key: config.supabase_api_key.clone(),
        }
    }

    fn get_headers(&self) -> Result<HeaderMap, StoreError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if !self.api_key.is_empty() {
            let key = HeaderValue::from_str(&self.api_key)
                .map_err(|e| StoreError::Backend(format!("Invalid Supabase API key: {}", e)))?;
            let bearer = HeaderValue::from_str(&format!("Bearer {}", self.api_key))
                .map_err(|e| StoreError::Backend(format!("Invalid Supabase API key: {}", e)))?;
            headers.insert("apikey", key);
            headers.insert(AUTHORIZATION, bearer);
        }

        Ok(headers)
    }

    pub async fn request<T>(&self, method: Method, path: &str, body: Option<&Value>) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making request to {}", url);

        let mut req = self.client.request(method, &url).headers(self.get_headers()?);
        if let Some(body_data) = body {
            req = req.json(body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("API error ({}): {}", status, error_text);
            return Err(StoreError::Backend(format!("API error ({}): {}", status, error_text)));
        }

        Ok(response.json::<T>().await?)
    }

    /// Inserts one row. A primary-key violation comes back as HTTP 409 and is
    /// reported as `InsertOutcome::Duplicate`.
    pub async fn insert(&self, path: &str, row: &Value) -> Result<InsertOutcome, StoreError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("Inserting row at {}", url);

        let response = self
            .client
            .post(&url)
            .headers(self.get_headers()?)
            .header("Prefer", "return=minimal")
            .json(row)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::CONFLICT {
            return Ok(InsertOutcome::Duplicate);
        }
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("API error ({}): {}", status, error_text);
            return Err(StoreError::Backend(format!("API error ({}): {}", status, error_text)));
        }

        Ok(InsertOutcome::Created)
    }
}

/// Record store on a Supabase (PostgREST) table whose primary key is
/// `(date, start_time)`. The database enforces uniqueness, so a plain insert
/// is the conditional write.
pub struct SupabaseRecordStore {
    client: SupabaseClient,
    table: String,
}

impl SupabaseRecordStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: SupabaseClient::new(config),
            table: config.appointments_table.clone(),
        }
    }

    fn table_path(&self) -> String {
        format!("/rest/v1/{}", encode(&self.table))
    }
}

#[async_trait]
impl RecordStore for SupabaseRecordStore {
    async fn get(&self, key: &SlotKey) -> Result<Option<Value>, StoreError> {
        let path = format!(
            "{}?date=eq.{}&start_time=eq.{}",
            self.table_path(),
            encode(&key.date),
            encode(&key.start_time)
        );

        let mut rows: Vec<Value> = self.client.request(Method::GET, &path, None).await?;
        if rows.len() > 1 {
            warn!("{} rows share slot {}, returning the first", rows.len(), key);
        }

        Ok(if rows.is_empty() { None } else { Some(rows.swap_remove(0)) })
    }

    async fn put_if_absent(&self, key: &SlotKey, record: Value) -> Result<(), StoreError> {
        match self.client.insert(&self.table_path(), &record).await? {
            InsertOutcome::Created => Ok(()),
            InsertOutcome::Duplicate => {
                warn!("Insert refused for occupied slot {}", key);
                Err(StoreError::Conflict(key.clone()))
            }
        }
    }

    async fn query_by_attribute(&self, attribute: &str, value: &Value) -> Result<Vec<Value>, StoreError> {
        let path = format!(
            "{}?{}=eq.{}",
            self.table_path(),
            encode(attribute),
            encode(&attribute_text(value))
        );

        self.client.request(Method::GET, &path, None).await
    }

    async fn scan_all(&self) -> Result<Vec<Value>, StoreError> {
        self.client.request(Method::GET, &self.table_path(), None).await
    }
}
