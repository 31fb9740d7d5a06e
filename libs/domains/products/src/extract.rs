//! Request extractors for product routes.

use axum::{
    Form, Json,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Multipart, Path, Request},
    http::{StatusCode, header::CONTENT_TYPE, request::Parts},
};

use crate::error::{ProductError, ProductResult};
use crate::models::{FormValue, ImageInput, ProductSubmission, UploadedImage};

/// Numeric product id from the `{id}` path segment.
///
/// A segment that is not an `i64` can never match a row, so it is rejected
/// as not found rather than as a bad request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductId(pub i64);

impl<S> FromRequestParts<S> for ProductId
where
    S: Send + Sync,
{
    type Rejection = ProductError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| ProductError::InvalidBody(e.body_text()))?;

        raw.trim()
            .parse::<i64>()
            .map(ProductId)
            .map_err(|_| ProductError::NotFound(raw))
    }
}

/// Create/update body in any of the shapes clients send.
///
/// - `multipart/form-data`: text fields plus an optional `image` file part
/// - `application/json`: an object; numbers may be sent as numbers or strings
/// - `application/x-www-form-urlencoded`
///
/// A request without a body yields an empty submission so validation can
/// report every required field.
pub struct ProductForm(pub ProductSubmission);

fn body_rejection(status: StatusCode, text: String) -> ProductError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        ProductError::PayloadTooLarge(text)
    } else {
        ProductError::InvalidBody(text)
    }
}

impl<S> FromRequest<S> for ProductForm
where
    S: Send + Sync,
{
    type Rejection = ProductError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| body_rejection(e.status(), e.body_text()))?;
            return read_multipart(multipart).await.map(ProductForm);
        }

        if content_type.starts_with("application/json") {
            let Json(value) = Json::<serde_json::Value>::from_request(req, state)
                .await
                .map_err(|e| body_rejection(e.status(), e.body_text()))?;

            return match value {
                serde_json::Value::Object(object) => {
                    Ok(ProductForm(ProductSubmission::from_json_object(object)))
                }
                _ => Err(ProductError::InvalidBody(
                    "Expected a JSON object".to_string(),
                )),
            };
        }

        if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|e| body_rejection(e.status(), e.body_text()))?;

            let mut submission = ProductSubmission::default();
            for (key, value) in pairs {
                submission.insert(key, FormValue::Text(value));
            }
            return Ok(ProductForm(submission));
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| body_rejection(e.status(), e.body_text()))?;

        if bytes.is_empty() {
            Ok(ProductForm(ProductSubmission::default()))
        } else {
            Err(ProductError::InvalidBody(format!(
                "Unsupported content type '{}'",
                content_type
            )))
        }
    }
}

async fn read_multipart(mut multipart: Multipart) -> ProductResult<ProductSubmission> {
    let mut submission = ProductSubmission::default();

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        let is_file = field.file_name().is_some() || field.content_type().is_some();
        if name == "image" && is_file {
            let file_name = field
                .file_name()
                .filter(|file_name| !file_name.is_empty())
                .map(str::to_string);
            let bytes = field.bytes().await?;

            // An untouched <input type="file"> still sends an empty part
            if bytes.is_empty() && file_name.is_none() {
                continue;
            }

            tracing::debug!(file_name = ?file_name, size = bytes.len(), "Received image upload");
            submission.image = Some(ImageInput::File(UploadedImage { file_name, bytes }));
            continue;
        }

        let value = field.text().await?;
        submission.insert(name, FormValue::Text(value));
    }

    Ok(submission)
}
