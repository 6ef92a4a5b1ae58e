//! Typed errors and HTTP mapping.

use crate::service::ValidationErrors;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Startup configuration problems (environment variables).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {var}: '{value}' ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Failures raised by a marker store backend.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("validation failed on {} field(s)", .0.len())]
    Validation(ValidationErrors),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    PayloadTooLarge(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(errors)
    }
}

/// Body of every non-validation error: `{code, message}`.
#[derive(Serialize, ToSchema)]
pub struct ErrorBody {
    pub code: u16,
    pub message: String,
}

/// Body of a validation failure: `{code, message, errors}`.
#[derive(Serialize, ToSchema)]
pub struct ValidationErrorBody {
    pub code: u16,
    pub message: String,
    pub errors: ValidationErrors,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(errors) => {
                tracing::debug!(fields = errors.len(), "request rejected by validation");
                let status = StatusCode::BAD_REQUEST;
                let body = ValidationErrorBody {
                    code: status.as_u16(),
                    message: "Validation Error".to_string(),
                    errors,
                };
                (status, Json(body)).into_response()
            }
            AppError::NotFound(message) => error_response(StatusCode::NOT_FOUND, message),
            AppError::BadRequest(message) => error_response(StatusCode::BAD_REQUEST, message),
            AppError::PayloadTooLarge(message) => {
                error_response(StatusCode::PAYLOAD_TOO_LARGE, message)
            }
            AppError::Store(e) => {
                tracing::error!(error = %e, "store operation failed");
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        }
    }
}

pub fn error_response(status: StatusCode, message: String) -> Response {
    let body = ErrorBody {
        code: status.as_u16(),
        message,
    };
    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::{FieldError, Location};
    use serde_json::{json, Value};

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn not_found_renders_code_and_message() {
        let response = AppError::NotFound("Marker does not exist".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            json!({"code": 404, "message": "Marker does not exist"})
        );
    }

    #[tokio::test]
    async fn validation_lists_every_field() {
        let mut errors = ValidationErrors::default();
        errors.push(FieldError::new(
            "title",
            Location::Body,
            "\"title\" is required".into(),
        ));
        let response = AppError::from(errors).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["code"], 400);
        assert_eq!(body["errors"][0]["field"], "title");
        assert_eq!(body["errors"][0]["location"], "body");
        assert_eq!(body["errors"][0]["messages"][0], "\"title\" is required");
    }

    #[tokio::test]
    async fn store_errors_hide_details() {
        let err = StoreError::Unavailable("connection refused to 10.0.0.7".into());
        let response = AppError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Internal Server Error");
        assert!(!body.to_string().contains("10.0.0.7"));
    }
}
