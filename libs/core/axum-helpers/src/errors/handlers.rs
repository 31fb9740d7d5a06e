use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::ErrorCode;
use crate::envelope::{Enveloped, MessageResponse};

/// Router fallback for unknown paths.
pub async fn not_found() -> Response {
    Enveloped(
        StatusCode::NOT_FOUND,
        MessageResponse::failure(ErrorCode::NotFound.default_message()),
    )
    .into_response()
}

/// Fallback for a known path hit with an unsupported method.
pub async fn method_not_allowed() -> Response {
    Enveloped(
        StatusCode::METHOD_NOT_ALLOWED,
        MessageResponse::failure(ErrorCode::MethodNotAllowed.default_message()),
    )
    .into_response()
}
