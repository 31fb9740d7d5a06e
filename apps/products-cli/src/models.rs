//! Wire types returned by the products API.

use serde::{Deserialize, de::DeserializeOwned};
use std::collections::BTreeMap;

/// Field name to human-readable messages, as sent with a 422
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// `{ success, data?, message?, errors? }`
#[derive(Debug, Deserialize)]
#[serde(bound = "T: DeserializeOwned")]
pub struct Envelope<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub errors: Option<FieldErrors>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock: i64,
    pub image: Option<String>,
    pub image_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Form fields for create and update.
///
/// Amounts stay textual; the server owns validation and reports bad input
/// field by field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductInput {
    pub name: String,
    pub description: Option<String>,
    pub price: String,
    pub stock: String,
    pub image: Option<std::path::PathBuf>,
}

impl ProductInput {
    /// Pre-fill from an existing product, the way an edit form does
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            price: format_amount(product.price),
            stock: product.stock.to_string(),
            image: None,
        }
    }
}

/// `850000.0` becomes `"850000"`, `19.5` stays `"19.5"`
fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
