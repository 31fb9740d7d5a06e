pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use thiserror::Error;

use crate::envelope::{Enveloped, FieldErrors, MessageResponse};

/// Application error type that renders as the failure envelope.
///
/// Client errors echo their message. Server-side failures are logged with
/// full detail and answered with a generic `"Server Error"` so no internals
/// leak to callers.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("Validation failed on {} field(s)", .0.len())]
    Validation(FieldErrors),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Path extraction error: {0}")]
    PathRejection(#[from] PathRejection),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Method Not Allowed: {0}")]
    MethodNotAllowed(String),

    #[error("Payload Too Large: {0}")]
    PayloadTooLarge(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),

    #[error("Service Unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::JsonExtractorRejection(e) => e.status(),
            AppError::PathRejection(e) => e.status(),
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Database(_)
            | AppError::Io(_)
            | AppError::Storage(_)
            | AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation(_) => ErrorCode::ValidationError,
            AppError::BadRequest(_)
            | AppError::JsonExtractorRejection(_)
            | AppError::PathRejection(_) => ErrorCode::InvalidBody,
            AppError::NotFound(_) => ErrorCode::NotFound,
            AppError::MethodNotAllowed(_) => ErrorCode::MethodNotAllowed,
            AppError::PayloadTooLarge(_) => ErrorCode::PayloadTooLarge,
            AppError::Database(_) => ErrorCode::DatabaseError,
            AppError::Io(_) => ErrorCode::IoError,
            AppError::Storage(_) => ErrorCode::StorageError,
            AppError::InternalServerError(_) => ErrorCode::InternalError,
            AppError::ServiceUnavailable(_) => ErrorCode::ServiceUnavailable,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        let body = match self {
            AppError::Validation(errors) => {
                tracing::info!(
                    error_code = code.code(),
                    fields = ?errors.keys().collect::<Vec<_>>(),
                    "Validation failed"
                );
                MessageResponse::validation(errors)
            }
            AppError::JsonExtractorRejection(e) => {
                tracing::warn!(error_code = code.code(), "JSON extraction error: {}", e);
                MessageResponse::failure(e.body_text())
            }
            AppError::PathRejection(e) => {
                tracing::warn!(error_code = code.code(), "Path extraction error: {}", e);
                MessageResponse::failure(e.body_text())
            }
            AppError::BadRequest(msg)
            | AppError::NotFound(msg)
            | AppError::MethodNotAllowed(msg)
            | AppError::PayloadTooLarge(msg) => {
                tracing::info!(error_code = code.code(), status = %status, "{}", msg);
                MessageResponse::failure(msg)
            }
            AppError::ServiceUnavailable(msg) => {
                tracing::warn!(error_code = code.code(), "Service unavailable: {}", msg);
                MessageResponse::failure(msg)
            }
            AppError::Database(e) => {
                tracing::error!(error_code = code.code(), "Database error: {:?}", e);
                MessageResponse::failure(code.default_message())
            }
            AppError::Io(e) => {
                tracing::error!(error_code = code.code(), "I/O error: {:?}", e);
                MessageResponse::failure(code.default_message())
            }
            AppError::Storage(msg) | AppError::InternalServerError(msg) => {
                tracing::error!(error_code = code.code(), "{}", msg);
                MessageResponse::failure(code.default_message())
            }
        };

        Enveloped(status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::{Value, json};

    async fn render(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_validation_renders_422_with_errors_only() {
        let mut errors = FieldErrors::new();
        errors.insert(
            "stock".into(),
            vec!["The stock field must be at least 0.".into()],
        );

        let (status, body) = render(AppError::Validation(errors)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body,
            json!({ "success": false, "errors": { "stock": ["The stock field must be at least 0."] } })
        );
    }

    #[tokio::test]
    async fn test_not_found_renders_message() {
        let (status, body) = render(AppError::NotFound("Product not found".into())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "success": false, "message": "Product not found" }));
    }

    #[tokio::test]
    async fn test_server_errors_hide_details() {
        let (status, body) =
            render(AppError::Database(DbErr::Custom("relation missing".into()))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "success": false, "message": "Server Error" }));

        let (_, body) = render(AppError::Storage("disk full at /var/lib".into())).await;
        assert_eq!(body["message"], "Server Error");
    }

    #[test]
    fn test_status_and_code_mapping() {
        let err = AppError::PayloadTooLarge("too big".into());
        assert_eq!(err.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(err.code(), ErrorCode::PayloadTooLarge);

        let err = AppError::MethodNotAllowed("nope".into());
        assert_eq!(err.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
