use axum::{
    http::{header, HeaderValue, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::{self, TraceLayer};
use tracing::Level;

use appointment_cell::appointment_routes;
use barber_cell::barber_routes;
use shared_database::SharedStore;
use shared_models::error::AppError;

pub fn create_router(store: SharedStore) -> Router {
    // Answers every OPTIONS request itself, on any path, before routing.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/barbers", barber_routes())
        .nest("/appointments", appointment_routes(store))
        .fallback(not_found)
        .layer(middleware::map_response(unsupported_method_as_not_found))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new().level(Level::INFO))
                .on_response(trace::DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        // Outside the CORS layer so preflight responses carry it too.
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        ))
}

async fn not_found() -> AppError {
    AppError::not_found()
}

// A known path with an unrouted method is reported like any unknown route.
async fn unsupported_method_as_not_found(response: Response) -> Response {
    if response.status() == StatusCode::METHOD_NOT_ALLOWED {
        return AppError::not_found().into_response();
    }
    response
}
