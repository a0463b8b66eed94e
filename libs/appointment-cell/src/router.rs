// libs/appointment-cell/src/router.rs
use axum::{
    routing::{get, post},
    Router,
};

use shared_database::SharedStore;

use crate::handlers;

/// Routes mounted at `/appointments`.
pub fn appointment_routes(store: SharedStore) -> Router {
    Router::new()
        .route("/", get(handlers::list_appointments_by_date))
        .route("/all", get(handlers::list_all_appointments))
        .route("/book", post(handlers::book_appointment))
        .with_state(store)
}
