pub mod artists;
pub mod home;
pub mod shows;
pub mod venues;

use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use crate::http_server::error::AppError;

/// The integer id in a `/{id}` path segment. Anything else is a 404.
pub struct RecordId(pub i64);

impl<S> FromRequestParts<S> for RecordId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::NotFound)?;
        raw.parse().map(RecordId).map_err(|_| AppError::NotFound)
    }
}
