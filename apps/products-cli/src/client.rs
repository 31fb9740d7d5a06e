//! HTTP client for the products API.

use reqwest::{
    Method, RequestBuilder, StatusCode,
    multipart::{Form, Part},
};
use serde::de::{DeserializeOwned, IgnoredAny};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use crate::models::{Envelope, FieldErrors, Product, ProductInput};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// 422 with per-field messages
    #[error("Validation failed")]
    Validation(FieldErrors),

    /// Any other envelope with `success: false`
    #[error("{message} ({status})")]
    Api { status: StatusCode, message: String },

    /// Body was not an envelope at all
    #[error("Unexpected response ({status})")]
    UnexpectedResponse { status: StatusCode },

    #[error("Terminal I/O failed: {0}")]
    Terminal(#[source] std::io::Error),

    #[error("Cannot read image {path}: {source}")]
    Image {
        path: String,
        source: std::io::Error,
    },
}

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Clone, Debug)]
pub struct ProductsClient {
    http: reqwest::Client,
    base_url: String,
}

impl ProductsClient {
    /// `base_url` is the API root, e.g. `http://localhost:8080/api`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn collection_url(&self) -> String {
        format!("{}/products", self.base_url)
    }

    fn item_url(&self, id: i64) -> String {
        format!("{}/products/{}", self.base_url, id)
    }

    pub async fn list(&self) -> ClientResult<Vec<Product>> {
        let envelope: Envelope<Vec<Product>> = send(self.http.get(self.collection_url())).await?;
        Ok(envelope.data.unwrap_or_default())
    }

    pub async fn get(&self, id: i64) -> ClientResult<Product> {
        let envelope = send(self.http.get(self.item_url(id))).await?;
        require_data(envelope)
    }

    /// Returns the created product and the server's confirmation message
    pub async fn create(&self, input: &ProductInput) -> ClientResult<(Product, Option<String>)> {
        let form = build_form(input).await?;
        let mut envelope = send(self.http.post(self.collection_url()).multipart(form)).await?;
        let message = envelope.message.take();
        Ok((require_data(envelope)?, message))
    }

    /// Full replacement; an absent image keeps the stored one
    pub async fn update(
        &self,
        id: i64,
        input: &ProductInput,
    ) -> ClientResult<(Product, Option<String>)> {
        let form = build_form(input).await?;
        let request = self
            .http
            .request(Method::PUT, self.item_url(id))
            .multipart(form);
        let mut envelope = send(request).await?;
        let message = envelope.message.take();
        Ok((require_data(envelope)?, message))
    }

    pub async fn delete(&self, id: i64) -> ClientResult<Option<String>> {
        let envelope: Envelope<IgnoredAny> = send(self.http.delete(self.item_url(id))).await?;
        Ok(envelope.message)
    }
}

async fn send<T: DeserializeOwned>(request: RequestBuilder) -> ClientResult<Envelope<T>> {
    let response = request.header("Accept", "application/json").send().await?;
    let status = response.status();
    debug!(%status, url = %response.url(), "API response");

    let body = response.bytes().await?;
    let envelope: Envelope<T> = serde_json::from_slice(&body)
        .map_err(|_| ClientError::UnexpectedResponse { status })?;

    if status == StatusCode::UNPROCESSABLE_ENTITY {
        if let Some(errors) = envelope.errors {
            return Err(ClientError::Validation(errors));
        }
        return Err(ClientError::UnexpectedResponse { status });
    }

    if !status.is_success() || !envelope.success {
        return Err(ClientError::Api {
            status,
            message: envelope
                .message
                .unwrap_or_else(|| "Something went wrong".to_string()),
        });
    }

    Ok(envelope)
}

fn require_data<T>(envelope: Envelope<T>) -> ClientResult<T> {
    envelope.data.ok_or(ClientError::UnexpectedResponse {
        status: StatusCode::OK,
    })
}

async fn build_form(input: &ProductInput) -> ClientResult<Form> {
    let mut form = Form::new()
        .text("name", input.name.clone())
        .text("description", input.description.clone().unwrap_or_default())
        .text("price", input.price.clone())
        .text("stock", input.stock.clone());

    if let Some(path) = &input.image {
        form = form.part("image", image_part(path).await?);
    }

    Ok(form)
}

async fn image_part(path: &Path) -> ClientResult<Part> {
    let bytes = tokio::fs::read(path).await.map_err(|source| ClientError::Image {
        path: path.display().to_string(),
        source,
    })?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());

    let part = Part::bytes(bytes).file_name(file_name);
    match mime_for(path) {
        Some(mime) => Ok(part.mime_str(mime)?),
        None => Ok(part),
    }
}

/// Content type from the extension; the server sniffs the bytes anyway
fn mime_for(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}
