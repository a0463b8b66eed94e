// libs/appointment-cell/src/handlers.rs
use axum::{body::Bytes, extract::State, Json};
use serde_json::{json, Value};

use barber_cell::roster;
use shared_database::SharedStore;
use shared_models::error::AppError;
use shared_utils::extractor::QueryParams;

use crate::models::{AppointmentError, AppointmentQueryParams};
use crate::services::{AppointmentBookingService, AppointmentQueryService};

pub const SLOT_TAKEN_MESSAGE: &str = "Horário já reservado.";

/// Maps a service error onto the HTTP taxonomy. `context` becomes the message
/// of a 500 so callers can tell which operation hit the store.
fn to_app_error(error: AppointmentError, context: &str) -> AppError {
    match error {
        AppointmentError::ValidationError(msg) => AppError::ValidationError(msg),
        AppointmentError::MalformedInput(_) => AppError::MalformedInput("Invalid JSON body".to_string()),
        AppointmentError::SlotAlreadyBooked(_) => AppError::Conflict(SLOT_TAKEN_MESSAGE.to_string()),
        AppointmentError::StoreError(e) => AppError::store(context, e),
    }
}

#[axum::debug_handler]
pub async fn book_appointment(
    State(store): State<SharedStore>,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let booking_service = AppointmentBookingService::new(store);

    let appointment = booking_service
        .book_from_body(&body)
        .await
        .map_err(|e| to_app_error(e, "Error booking appointment"))?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment
    })))
}

#[axum::debug_handler]
pub async fn list_appointments_by_date(
    State(store): State<SharedStore>,
    QueryParams(params): QueryParams<AppointmentQueryParams>,
) -> Result<Json<Value>, AppError> {
    let query_service = AppointmentQueryService::new(store);

    let appointments = query_service
        .list_by_date(params.date.as_deref())
        .await
        .map_err(|e| to_app_error(e, "Error querying appointments"))?;

    Ok(Json(json!({
        "appointments": appointments,
        "barbers": roster()
    })))
}

#[axum::debug_handler]
pub async fn list_all_appointments(State(store): State<SharedStore>) -> Result<Json<Value>, AppError> {
    let query_service = AppointmentQueryService::new(store);

    let appointments = query_service
        .list_all()
        .await
        .map_err(|e| to_app_error(e, "Error scanning appointments"))?;

    Ok(Json(json!({
        "appointments": appointments,
        "barbers": roster()
    })))
}
