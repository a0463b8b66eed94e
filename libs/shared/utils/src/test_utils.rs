use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
};
use serde_json::{json, Value};

pub struct MockRecords;

impl MockRecords {
    pub fn appointment(date: &str, start_time: &str, barber_id: i64) -> Value {
        json!({
            "date": date,
            "start_time": start_time,
            "barber_id": barber_id,
            "duration": 40,
            "client_name": "Cliente Exemplo",
            "status": "booked"
        })
    }

    pub fn booking_request(barber_id: i64, date: &str, start_time: &str) -> Value {
        json!({
            "barber_id": barber_id,
            "date": date,
            "start_time": start_time
        })
    }
}

pub fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn json_request(method: Method, uri: &str, body: &Value) -> Request<Body> {
    raw_request(method, uri, body.to_string())
}

pub fn raw_request(method: Method, uri: &str, body: impl Into<String>) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.into()))
        .unwrap()
}

/// Splits a response into its status and decoded JSON body (`Value::Null`
/// for an empty body).
pub async fn response_json(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}
