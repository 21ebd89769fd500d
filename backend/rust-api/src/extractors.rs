use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use crate::handlers::ApiError;

/// Numeric record id taken from the single path parameter. Anything that is
/// not a valid id is treated as a missing record and answered with 404.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordId(pub i64);

impl<S> FromRequestParts<S> for RecordId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                tracing::warn!("Failed to extract path id: {}", rejection);
                ApiError::not_found("Page not found")
            })?;

        raw.parse::<i64>().map(RecordId).map_err(|_| {
            tracing::debug!("Non-numeric id in path: {:?}", raw);
            ApiError::not_found("Page not found")
        })
    }
}
