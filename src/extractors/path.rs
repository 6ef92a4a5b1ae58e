//! `:markerId` path segment with rejections rendered as JSON.

use crate::error::AppError;
use crate::service::schemas::MARKER_ID_PARAM;
use crate::service::{FieldError, Location, ValidationErrors};
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

/// Raw `markerId` segment. Shape checks happen in the route schema; this only
/// guarantees a decoded UTF-8 string.
#[derive(Clone, Debug)]
pub struct MarkerIdPath(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for MarkerIdPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<String>::from_request_parts(parts, state).await {
            Ok(Path(id)) => Ok(MarkerIdPath(id)),
            Err(e) => {
                let mut errors = ValidationErrors::default();
                errors.push(FieldError::new(
                    MARKER_ID_PARAM,
                    Location::Params,
                    format!("\"{}\" could not be decoded: {}", MARKER_ID_PARAM, e.body_text()),
                ));
                Err(errors.into())
            }
        }
    }
}
