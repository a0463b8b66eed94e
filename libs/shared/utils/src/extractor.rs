use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use tracing::debug;

use shared_models::error::AppError;

/// `Query` extractor whose rejection renders through `AppError`, so a broken
/// query string still gets the JSON envelope instead of axum's plain text.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryParams<T>(pub T);

impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                debug!("Rejected query string {:?}: {}", parts.uri.query(), rejection);
                AppError::BadRequest(rejection.body_text())
            })?;

        Ok(QueryParams(params))
    }
}
