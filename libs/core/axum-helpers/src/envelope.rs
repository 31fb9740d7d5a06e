//! JSON envelope shared by every API response.
//!
//! ```json
//! { "success": true, "message": "Product created successfully", "data": { ... } }
//! { "success": false, "message": "Product not found" }
//! { "success": false, "errors": { "price": ["The price field must be at least 0."] } }
//! ```
//!
//! Keys that carry no value are omitted.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// Field name to the list of messages it failed with
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<BTreeMap<String, Vec<String>>>)]
    pub errors: Option<FieldErrors>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            errors: None,
        }
    }

    pub fn ok_with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::ok(data)
        }
    }
}

/// Envelope without a `data` payload: confirmations and errors
pub type MessageResponse = ApiResponse<()>;

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
            errors: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            ..Self::message(message)
        }
    }

    pub fn validation(errors: FieldErrors) -> Self {
        Self {
            success: false,
            data: None,
            message: None,
            errors: Some(errors),
        }
    }
}

/// Pair an envelope with the status it should be sent with
pub struct Enveloped<T>(pub StatusCode, pub ApiResponse<T>);

impl<T: Serialize> IntoResponse for Enveloped<T> {
    fn into_response(self) -> Response {
        (self.0, Json(self.1)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ok_envelope_omits_empty_keys() {
        let body = serde_json::to_value(ApiResponse::ok(vec![1, 2])).unwrap();
        assert_eq!(body, json!({ "success": true, "data": [1, 2] }));
    }

    #[test]
    fn test_message_envelope() {
        let body =
            serde_json::to_value(ApiResponse::ok_with_message("Product created successfully", 7))
                .unwrap();
        assert_eq!(
            body,
            json!({ "success": true, "message": "Product created successfully", "data": 7 })
        );
    }

    #[test]
    fn test_failure_and_validation_envelopes() {
        let body = serde_json::to_value(MessageResponse::failure("Product not found")).unwrap();
        assert_eq!(body, json!({ "success": false, "message": "Product not found" }));

        let mut errors = FieldErrors::new();
        errors.insert("name".into(), vec!["The name field is required.".into()]);
        let body = serde_json::to_value(MessageResponse::validation(errors)).unwrap();
        assert_eq!(
            body,
            json!({ "success": false, "errors": { "name": ["The name field is required."] } })
        );
    }

    #[test]
    fn test_envelope_deserializes_without_optional_keys() {
        let parsed: ApiResponse<serde_json::Value> =
            serde_json::from_value(json!({ "success": true })).unwrap();
        assert!(parsed.success);
        assert!(parsed.data.is_none());
        assert!(parsed.errors.is_none());
    }
}
