use axum::Json;
use serde_json::{json, Value};
use tracing::debug;

use crate::models::roster;

pub async fn list_barbers() -> Json<Value> {
    debug!("Listing {} barbers", roster().len());
    Json(json!({ "barbers": roster() }))
}
