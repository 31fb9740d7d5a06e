use axum::body::Bytes;
use axum_helpers::FieldErrors;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;
use validator::Validate;

use crate::image::{self, ImageKind};
use crate::storage::image_url;

/// Product entity as stored by a repository
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock: i64,
    /// Storage key of the uploaded image, e.g. `products/1718000000_3f2a9c1e_mouse.png`
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Product as returned by the API, with the public image URL resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductResponse {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Mouse Logitech G502")]
    pub name: String,
    pub description: Option<String>,
    #[schema(example = 850000)]
    pub price: f64,
    #[schema(example = 50)]
    pub stock: i64,
    pub image: Option<String>,
    #[schema(example = "http://localhost:8080/storage/products/1718000000_3f2a9c1e_mouse.png")]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductResponse {
    pub fn new(product: Product, public_base_url: &str) -> Self {
        let image_url = product
            .image
            .as_deref()
            .map(|key| image_url(key, public_base_url));

        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            stock: product.stock,
            image: product.image,
            image_url,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

/// Validated input for a new product
#[derive(Debug, Clone, PartialEq)]
pub struct CreateProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock: i64,
    pub image: Option<String>,
}

/// Full replacement of a product's scalar fields.
///
/// `image: None` keeps the stored image.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock: i64,
    pub image: Option<String>,
}

/// Scalar fields that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFields {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock: i64,
}

impl ProductFields {
    pub fn into_create(self, image: Option<String>) -> CreateProduct {
        CreateProduct {
            name: self.name,
            description: self.description,
            price: self.price,
            stock: self.stock,
            image,
        }
    }

    pub fn into_update(self, image: Option<String>) -> UpdateProduct {
        UpdateProduct {
            name: self.name,
            description: self.description,
            price: self.price,
            stock: self.stock,
            image,
        }
    }
}

/// Raw value of a submitted field.
///
/// Form and multipart bodies only ever produce `Text`. JSON bodies can also
/// carry numbers and booleans (`Scalar`, kept in their JSON spelling) or
/// arrays and objects (`Structured`).
#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
    Text(String),
    Scalar(String),
    Structured,
}

impl FormValue {
    fn from_json(value: serde_json::Value) -> Option<Self> {
        use serde_json::Value;
        match value {
            Value::Null => None,
            Value::String(s) => Some(Self::Text(s)),
            Value::Number(n) => Some(Self::Scalar(n.to_string())),
            Value::Bool(b) => Some(Self::Scalar(b.to_string())),
            Value::Array(_) | Value::Object(_) => Some(Self::Structured),
        }
    }

    /// Trimmed text; blank strings count as absent
    fn present(&self) -> Option<&Self> {
        match self {
            Self::Text(s) | Self::Scalar(s) if s.trim().is_empty() => None,
            other => Some(other),
        }
    }
}

/// File part submitted as `image`
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedImage {
    pub file_name: Option<String>,
    pub bytes: Bytes,
}

/// What arrived under the `image` key
#[derive(Debug, Clone, PartialEq)]
pub enum ImageInput {
    File(UploadedImage),
    /// A non-file value (plain text, JSON scalar, ...)
    NotAFile,
}

/// A validated image ready to be stored
#[derive(Debug, Clone, PartialEq)]
pub struct ValidImage {
    pub kind: ImageKind,
    pub file_name: Option<String>,
    pub bytes: Bytes,
}

/// Create/update submission before validation.
///
/// Built by the [`ProductForm`](crate::extract::ProductForm) extractor from
/// multipart, urlencoded or JSON bodies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductSubmission {
    pub fields: HashMap<String, FormValue>,
    pub image: Option<ImageInput>,
    /// `_method` override sent by HTML forms
    pub method_override: Option<String>,
}

/// Range and length rules that apply once a value has been parsed
#[derive(Debug, Default, Validate)]
struct ParsedFields {
    #[validate(length(
        max = 255,
        message = "The name field must not be greater than 255 characters."
    ))]
    name: Option<String>,
    #[validate(range(min = 0.0, message = "The price field must be at least 0."))]
    price: Option<f64>,
    #[validate(range(min = 0.0, message = "The stock field must be at least 0."))]
    stock: Option<f64>,
}

fn push(errors: &mut FieldErrors, field: &str, message: impl Into<String>) {
    errors
        .entry(field.to_string())
        .or_default()
        .push(message.into());
}

impl ProductSubmission {
    pub fn text(mut self, key: &str, value: impl Into<String>) -> Self {
        self.fields
            .insert(key.to_string(), FormValue::Text(value.into()));
        self
    }

    pub fn with_image(mut self, file_name: Option<&str>, bytes: impl Into<Bytes>) -> Self {
        self.image = Some(ImageInput::File(UploadedImage {
            file_name: file_name.map(str::to_string),
            bytes: bytes.into(),
        }));
        self
    }

    /// Build a submission from a JSON object body
    pub fn from_json_object(object: serde_json::Map<String, serde_json::Value>) -> Self {
        let mut submission = Self::default();
        for (key, value) in object {
            let Some(value) = FormValue::from_json(value) else {
                continue;
            };
            submission.insert(key, value);
        }
        submission
    }

    /// Record a field, routing `_method` and `image` to their own slots
    pub fn insert(&mut self, key: String, value: FormValue) {
        match key.as_str() {
            "_method" => {
                if let FormValue::Text(method) | FormValue::Scalar(method) = value {
                    self.method_override = Some(method.trim().to_uppercase());
                }
            }
            "image" => {
                if value.present().is_some() {
                    self.image = Some(ImageInput::NotAFile);
                }
            }
            _ => {
                self.fields.insert(key, value);
            }
        }
    }

    fn field(&self, key: &str) -> Option<&FormValue> {
        self.fields.get(key).and_then(FormValue::present)
    }

    /// Check every field and collect all failures at once.
    ///
    /// Nothing is written before this returns `Ok`.
    pub fn validate(&self) -> Result<(ProductFields, Option<ValidImage>), FieldErrors> {
        let mut errors = FieldErrors::new();
        let mut parsed = ParsedFields::default();

        let name = match self.field("name") {
            None => {
                push(&mut errors, "name", "The name field is required.");
                None
            }
            Some(FormValue::Text(s)) => Some(s.trim().to_string()),
            Some(_) => {
                push(&mut errors, "name", "The name field must be a string.");
                None
            }
        };
        parsed.name = name.clone();

        let description = match self.field("description") {
            None => None,
            Some(FormValue::Text(s)) => Some(s.trim().to_string()),
            Some(_) => {
                push(
                    &mut errors,
                    "description",
                    "The description field must be a string.",
                );
                None
            }
        };

        let price = match self.field("price") {
            None => {
                push(&mut errors, "price", "The price field is required.");
                None
            }
            Some(value) => match parse_number(value) {
                Some(price) => Some(price),
                None => {
                    push(&mut errors, "price", "The price field must be a number.");
                    None
                }
            },
        };
        parsed.price = price;

        let stock = match self.field("stock") {
            None => {
                push(&mut errors, "stock", "The stock field is required.");
                None
            }
            Some(value) => {
                let integer = parse_integer(value);
                if integer.is_none() {
                    push(&mut errors, "stock", "The stock field must be an integer.");
                }
                // The minimum still applies to numeric non-integers like "-1.5"
                parsed.stock = parse_number(value);
                integer
            }
        };

        if let Err(failures) = parsed.validate() {
            for (field, field_errors) in failures.field_errors() {
                for error in field_errors {
                    if let Some(message) = &error.message {
                        push(&mut errors, field.as_ref(), message.to_string());
                    }
                }
            }
        }

        let image = match &self.image {
            None => None,
            Some(ImageInput::NotAFile) => {
                push(&mut errors, "image", image::NOT_AN_IMAGE);
                push(&mut errors, "image", image::WRONG_TYPE);
                None
            }
            Some(ImageInput::File(upload)) => match image::validate(upload) {
                Ok(valid) => Some(valid),
                Err(messages) => {
                    for message in messages {
                        push(&mut errors, "image", message);
                    }
                    None
                }
            },
        };

        match (errors.is_empty(), name, price, stock) {
            (true, Some(name), Some(price), Some(stock)) => Ok((
                ProductFields {
                    name,
                    description,
                    price,
                    stock,
                },
                image,
            )),
            _ => Err(errors),
        }
    }
}

fn parse_number(value: &FormValue) -> Option<f64> {
    match value {
        FormValue::Text(s) | FormValue::Scalar(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite()),
        FormValue::Structured => None,
    }
}

/// Integral numbers such as `7` or `7.0`
fn parse_integer(value: &FormValue) -> Option<i64> {
    if let FormValue::Text(s) | FormValue::Scalar(s) = value {
        if let Ok(n) = s.trim().parse::<i64>() {
            return Some(n);
        }
    }
    parse_number(value)
        .filter(|n| n.fract() == 0.0 && n.abs() < i64::MAX as f64)
        .map(|n| n as i64)
}
