use axum::{routing::get, Router};

use crate::handlers;

/// Routes mounted at `/barbers`.
pub fn barber_routes<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/", get(handlers::list_barbers))
}
