use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum_helpers::{AppError, FieldErrors};
use thiserror::Error;

use crate::storage::StorageError;

pub const NOT_FOUND_MESSAGE: &str = "Product not found";

#[derive(Debug, Error)]
pub enum ProductError {
    /// Unknown id, or a path segment that is not an id at all
    #[error("Product not found: {0}")]
    NotFound(String),

    #[error("Validation failed")]
    Validation(FieldErrors),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Request body too large: {0}")]
    PayloadTooLarge(String),

    #[error("Method {0} is not allowed here")]
    MethodNotAllowed(String),

    #[error("Image storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ProductResult<T> = Result<T, ProductError>;

impl From<MultipartError> for ProductError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ProductError::PayloadTooLarge(err.body_text())
        } else {
            ProductError::InvalidBody(err.body_text())
        }
    }
}

/// Convert ProductError to AppError for standardized error responses
impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(id) => {
                tracing::debug!(product_id = %id, "Product lookup missed");
                AppError::NotFound(NOT_FOUND_MESSAGE.to_string())
            }
            ProductError::Validation(errors) => AppError::Validation(errors),
            ProductError::InvalidBody(msg) => AppError::BadRequest(msg),
            ProductError::PayloadTooLarge(msg) => AppError::PayloadTooLarge(msg),
            ProductError::MethodNotAllowed(method) => AppError::MethodNotAllowed(format!(
                "The {} method is not supported for this route",
                method
            )),
            ProductError::Storage(e) => AppError::Storage(e.to_string()),
            ProductError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
