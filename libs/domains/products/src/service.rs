use std::sync::Arc;

use crate::error::{ProductError, ProductResult};
use crate::models::{Product, ProductResponse, ProductSubmission, ValidImage};
use crate::repository::ProductRepository;
use crate::storage::ImageStorage;

/// Service layer for Product business logic
pub struct ProductService<R: ProductRepository, S: ImageStorage> {
    repository: Arc<R>,
    images: Arc<S>,
}

impl<R: ProductRepository, S: ImageStorage> Clone for ProductService<R, S> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            images: Arc::clone(&self.images),
        }
    }
}

impl<R: ProductRepository, S: ImageStorage> ProductService<R, S> {
    pub fn new(repository: R, images: S) -> Self {
        Self {
            repository: Arc::new(repository),
            images: Arc::new(images),
        }
    }

    /// Attach the public image URL
    pub fn present(&self, product: Product) -> ProductResponse {
        ProductResponse::new(product, self.images.public_base_url())
    }

    pub async fn list_products(&self) -> ProductResult<Vec<Product>> {
        self.repository.list().await
    }

    pub async fn get_product(&self, id: i64) -> ProductResult<Product> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or_else(|| ProductError::NotFound(id.to_string()))
    }

    /// Validate, store the image (if any), then insert the row
    pub async fn create_product(&self, submission: ProductSubmission) -> ProductResult<Product> {
        let (fields, image) = submission.validate().map_err(ProductError::Validation)?;

        let image_key = self.store_image(image).await?;

        match self
            .repository
            .create(fields.into_create(image_key.clone()))
            .await
        {
            Ok(product) => Ok(product),
            Err(e) => {
                // The row never referenced the file
                if let Some(key) = image_key {
                    self.discard_image(&key).await;
                }
                Err(e)
            }
        }
    }

    /// Existence is checked before validation, so an unknown id is a 404
    /// even when the body is invalid.
    ///
    /// A new image is stored first, the row updated, then the previous file
    /// removed.
    pub async fn update_product(
        &self,
        id: i64,
        submission: ProductSubmission,
    ) -> ProductResult<Product> {
        let existing = self.get_product(id).await?;

        let (fields, image) = submission.validate().map_err(ProductError::Validation)?;

        let new_key = self.store_image(image).await?;

        let updated = match self
            .repository
            .update(id, fields.into_update(new_key.clone()))
            .await
        {
            Ok(product) => product,
            Err(e) => {
                if let Some(key) = new_key {
                    self.discard_image(&key).await;
                }
                return Err(e);
            }
        };

        if let (Some(_), Some(old_key)) = (&new_key, existing.image) {
            self.discard_image(&old_key).await;
        }

        Ok(updated)
    }

    /// Remove the row, then its image
    pub async fn delete_product(&self, id: i64) -> ProductResult<()> {
        let existing = self.get_product(id).await?;

        if !self.repository.delete(id).await? {
            return Err(ProductError::NotFound(id.to_string()));
        }

        if let Some(key) = existing.image {
            self.discard_image(&key).await;
        }

        Ok(())
    }

    async fn store_image(&self, image: Option<ValidImage>) -> ProductResult<Option<String>> {
        let Some(image) = image else {
            return Ok(None);
        };

        let key = self
            .images
            .save(&image.bytes, image.file_name.as_deref(), image.kind)
            .await?;
        Ok(Some(key))
    }

    /// Best-effort removal; the row operation has already succeeded
    async fn discard_image(&self, key: &str) {
        if let Err(e) = self.images.delete(key).await {
            tracing::warn!(image_key = %key, error = %e, "Failed to delete product image");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreateProduct, UpdateProduct};
    use crate::repository::{InMemoryProductRepository, MockProductRepository};
    use crate::storage::InMemoryImageStorage;
    use chrono::Utc;
    use mockall::predicate::eq;

    const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";
    const GIF: &[u8] = b"GIF89a\x01\0\x01\0";

    fn submission() -> ProductSubmission {
        ProductSubmission::default()
            .text("name", "Headset HyperX Cloud II")
            .text("price", "1100000")
            .text("stock", "25")
    }

    fn product(id: i64, image: Option<&str>) -> Product {
        let now = Utc::now();
        Product {
            id,
            name: "Headset HyperX Cloud II".into(),
            description: None,
            price: 1100000.0,
            stock: 25,
            image: image.map(str::to_string),
            created_at: now,
            updated_at: now,
        }
    }

    fn service() -> (
        ProductService<InMemoryProductRepository, InMemoryImageStorage>,
        InMemoryImageStorage,
    ) {
        let images = InMemoryImageStorage::new("http://localhost:8080/storage");
        let service = ProductService::new(InMemoryProductRepository::new(), images.clone());
        (service, images)
    }

    #[tokio::test]
    async fn test_create_product_stores_image() {
        let (service, images) = service();

        let created = service
            .create_product(submission().with_image(Some("headset.png"), PNG.to_vec()))
            .await
            .unwrap();

        let key = created.image.clone().unwrap();
        assert!(key.starts_with("products/"));
        assert!(key.ends_with("_headset.png"));
        assert_eq!(images.get(&key).await.unwrap(), PNG);

        let response = service.present(created);
        assert_eq!(
            response.image_url,
            Some(format!("http://localhost:8080/storage/{}", key))
        );
    }

    #[tokio::test]
    async fn test_invalid_create_writes_nothing() {
        let (service, images) = service();

        let result = service
            .create_product(
                submission()
                    .text("stock", "-1")
                    .with_image(Some("headset.png"), PNG.to_vec()),
            )
            .await;

        assert!(matches!(result, Err(ProductError::Validation(ref e)) if e.contains_key("stock")));
        assert!(images.is_empty().await);
        assert!(service.list_products().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_replaces_and_deletes_old_image() {
        let (service, images) = service();
        let created = service
            .create_product(submission().with_image(Some("old.png"), PNG.to_vec()))
            .await
            .unwrap();
        let old_key = created.image.clone().unwrap();

        let updated = service
            .update_product(
                created.id,
                submission()
                    .text("name", "Headset v2")
                    .with_image(Some("new.gif"), GIF.to_vec()),
            )
            .await
            .unwrap();

        let new_key = updated.image.clone().unwrap();
        assert_ne!(new_key, old_key);
        assert_eq!(updated.name, "Headset v2");
        assert!(!images.exists(&old_key).await.unwrap());
        assert!(images.exists(&new_key).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_without_image_keeps_key() {
        let (service, images) = service();
        let created = service
            .create_product(submission().with_image(Some("keep.png"), PNG.to_vec()))
            .await
            .unwrap();

        let updated = service
            .update_product(created.id, submission().text("stock", "3"))
            .await
            .unwrap();

        assert_eq!(updated.image, created.image);
        assert_eq!(updated.stock, 3);
        assert_eq!(images.len().await, 1);
    }

    #[tokio::test]
    async fn test_update_missing_product_is_not_found_before_validation() {
        let (service, _) = service();

        let result = service
            .update_product(42, ProductSubmission::default())
            .await;

        assert!(matches!(result, Err(ProductError::NotFound(id)) if id == "42"));
    }

    #[tokio::test]
    async fn test_delete_removes_row_and_image() {
        let (service, images) = service();
        let created = service
            .create_product(submission().with_image(Some("gone.png"), PNG.to_vec()))
            .await
            .unwrap();

        service.delete_product(created.id).await.unwrap();

        assert!(matches!(
            service.get_product(created.id).await,
            Err(ProductError::NotFound(_))
        ));
        assert!(images.is_empty().await);
    }

    #[tokio::test]
    async fn test_get_product_not_found() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_get_by_id()
            .with(eq(5))
            .returning(|_| Ok(None));

        let service = ProductService::new(mock_repo, InMemoryImageStorage::default());
        let result = service.get_product(5).await;

        assert!(matches!(result, Err(ProductError::NotFound(id)) if id == "5"));
    }

    #[tokio::test]
    async fn test_failed_insert_discards_stored_image() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_create()
            .times(1)
            .returning(|_: CreateProduct| Err(ProductError::Internal("insert failed".into())));

        let images = InMemoryImageStorage::default();
        let service = ProductService::new(mock_repo, images.clone());

        let result = service
            .create_product(submission().with_image(Some("x.png"), PNG.to_vec()))
            .await;

        assert!(matches!(result, Err(ProductError::Internal(_))));
        assert!(images.is_empty().await);
    }

    #[tokio::test]
    async fn test_failed_update_keeps_old_image() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_get_by_id()
            .with(eq(9))
            .returning(|id| Ok(Some(product(id, Some("products/1_aaaaaaaa_old.png")))));
        mock_repo
            .expect_update()
            .returning(|_, _: UpdateProduct| Err(ProductError::Internal("update failed".into())));

        let images = InMemoryImageStorage::default();
        let service = ProductService::new(mock_repo, images.clone());

        let result = service
            .update_product(9, submission().with_image(Some("new.png"), PNG.to_vec()))
            .await;

        assert!(matches!(result, Err(ProductError::Internal(_))));
        assert!(images.is_empty().await, "new upload should be discarded");
    }

    #[tokio::test]
    async fn test_delete_race_reports_not_found() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_get_by_id()
            .returning(|id| Ok(Some(product(id, None))));
        mock_repo.expect_delete().with(eq(3)).returning(|_| Ok(false));

        let service = ProductService::new(mock_repo, InMemoryImageStorage::default());

        assert!(matches!(
            service.delete_product(3).await,
            Err(ProductError::NotFound(_))
        ));
    }
}
