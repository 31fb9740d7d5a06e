use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, Product, UpdateProduct};

/// Repository trait for Product persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Insert a product; the repository assigns the id
    async fn create(&self, input: CreateProduct) -> ProductResult<Product>;

    async fn get_by_id(&self, id: i64) -> ProductResult<Option<Product>>;

    /// All products, newest first
    async fn list(&self) -> ProductResult<Vec<Product>>;

    /// Replace the scalar fields; `input.image: None` keeps the stored key
    async fn update(&self, id: i64, input: UpdateProduct) -> ProductResult<Product>;

    /// Returns `false` when no row matched
    async fn delete(&self, id: i64) -> ProductResult<bool>;
}

#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<i64, Product>,
    last_id: i64,
}

/// In-memory implementation of ProductRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryProductRepository {
    table: Arc<RwLock<Table>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, input: CreateProduct) -> ProductResult<Product> {
        let mut table = self.table.write().await;

        // Ids are never reused, even after deletes
        table.last_id += 1;
        let now = Utc::now();
        let product = Product {
            id: table.last_id,
            name: input.name,
            description: input.description,
            price: input.price,
            stock: input.stock,
            image: input.image,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(product.id, product.clone());

        tracing::info!(product_id = product.id, "Created product");
        Ok(product)
    }

    async fn get_by_id(&self, id: i64) -> ProductResult<Option<Product>> {
        let table = self.table.read().await;
        Ok(table.rows.get(&id).cloned())
    }

    async fn list(&self) -> ProductResult<Vec<Product>> {
        let table = self.table.read().await;

        let mut products: Vec<Product> = table.rows.values().cloned().collect();
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(products)
    }

    async fn update(&self, id: i64, input: UpdateProduct) -> ProductResult<Product> {
        let mut table = self.table.write().await;

        let product = table
            .rows
            .get_mut(&id)
            .ok_or_else(|| ProductError::NotFound(id.to_string()))?;

        product.name = input.name;
        product.description = input.description;
        product.price = input.price;
        product.stock = input.stock;
        if let Some(image) = input.image {
            product.image = Some(image);
        }
        product.updated_at = Utc::now();

        tracing::info!(product_id = id, "Updated product");
        Ok(product.clone())
    }

    async fn delete(&self, id: i64) -> ProductResult<bool> {
        let mut table = self.table.write().await;

        if table.rows.remove(&id).is_some() {
            tracing::info!(product_id = id, "Deleted product");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
