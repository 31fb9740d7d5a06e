//! OpenAPI response types mirroring the failure envelopes.

#[allow(unused_imports)]
use serde_json::json;
use std::collections::BTreeMap;
use utoipa::{ToResponse, ToSchema};

/// `{ "success": ..., "message": ... }`
#[derive(ToSchema)]
pub struct MessageBody {
    pub success: bool,
    pub message: String,
}

/// `{ "success": false, "errors": { field: [messages] } }`
#[derive(ToSchema)]
pub struct ValidationBody {
    pub success: bool,
    pub errors: BTreeMap<String, Vec<String>>,
}

#[derive(ToResponse)]
#[response(
    description = "Resource not found",
    content_type = "application/json",
    example = json!({
        "success": false,
        "message": "Product not found"
    })
)]
pub struct NotFoundResponse(pub MessageBody);

#[derive(ToResponse)]
#[response(
    description = "Unprocessable Entity - Validation failed",
    content_type = "application/json",
    example = json!({
        "success": false,
        "errors": {
            "name": ["The name field is required."],
            "price": ["The price field must be at least 0."]
        }
    })
)]
pub struct ValidationErrorResponse(pub ValidationBody);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - Body could not be parsed",
    content_type = "application/json",
    example = json!({
        "success": false,
        "message": "Failed to parse request body"
    })
)]
pub struct BadRequestResponse(pub MessageBody);

#[derive(ToResponse)]
#[response(
    description = "Internal Server Error",
    content_type = "application/json",
    example = json!({
        "success": false,
        "message": "Server Error"
    })
)]
pub struct InternalServerErrorResponse(pub MessageBody);

#[derive(ToResponse)]
#[response(
    description = "Payload Too Large",
    content_type = "application/json",
    example = json!({
        "success": false,
        "message": "Request body is too large"
    })
)]
pub struct PayloadTooLargeResponse(pub MessageBody);
