use async_trait::async_trait;
use chrono::Utc;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryOrder,
};

use crate::{
    entity,
    error::{ProductError, ProductResult},
    models::{CreateProduct, Product, UpdateProduct},
    repository::ProductRepository,
};

fn db_error(e: sea_orm::DbErr) -> ProductError {
    ProductError::Internal(format!("Database error: {}", e))
}

#[derive(Clone)]
pub struct PgProductRepository {
    db: DatabaseConnection,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn create(&self, input: CreateProduct) -> ProductResult<Product> {
        let now = Utc::now();
        let active_model = entity::ActiveModel {
            id: NotSet,
            name: Set(input.name),
            description: Set(input.description),
            price: Set(input.price),
            stock: Set(input.stock),
            image: Set(input.image),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        let model = active_model.insert(&self.db).await.map_err(db_error)?;

        tracing::info!(product_id = model.id, "Created product");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: i64) -> ProductResult<Option<Product>> {
        let model = entity::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error)?;

        Ok(model.map(|m| m.into()))
    }

    async fn list(&self) -> ProductResult<Vec<Product>> {
        let models = entity::Entity::find()
            .order_by_desc(entity::Column::CreatedAt)
            .order_by_desc(entity::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_error)?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }

    async fn update(&self, id: i64, input: UpdateProduct) -> ProductResult<Product> {
        let model = entity::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error)?
            .ok_or_else(|| ProductError::NotFound(id.to_string()))?;

        let mut active_model = model.into_active_model();
        active_model.name = Set(input.name);
        active_model.description = Set(input.description);
        active_model.price = Set(input.price);
        active_model.stock = Set(input.stock);
        if let Some(image) = input.image {
            active_model.image = Set(Some(image));
        }
        active_model.updated_at = Set(Utc::now().into());

        let updated = active_model.update(&self.db).await.map_err(db_error)?;

        tracing::info!(product_id = id, "Updated product");
        Ok(updated.into())
    }

    async fn delete(&self, id: i64) -> ProductResult<bool> {
        let result = entity::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_error)?;

        if result.rows_affected > 0 {
            tracing::info!(product_id = id, "Deleted product");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn row(id: i64, name: &str) -> entity::Model {
        let now = Utc::now().fixed_offset();
        entity::Model {
            id,
            name: name.to_string(),
            description: None,
            price: 1200000.0,
            stock: 30,
            image: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_get_by_id_maps_model() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row(7, "Keyboard Mechanical Keychron K2")]])
            .into_connection();
        let repo = PgProductRepository::new(db);

        let product = repo.get_by_id(7).await.unwrap().unwrap();
        assert_eq!(product.id, 7);
        assert_eq!(product.name, "Keyboard Mechanical Keychron K2");
        assert_eq!(product.price, 1200000.0);
    }

    #[tokio::test]
    async fn test_update_missing_row_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<entity::Model>::new()])
            .into_connection();
        let repo = PgProductRepository::new(db);

        let result = repo
            .update(
                404,
                UpdateProduct {
                    name: "X".into(),
                    description: None,
                    price: 0.0,
                    stock: 0,
                    image: None,
                },
            )
            .await;
        assert!(matches!(result, Err(ProductError::NotFound(id)) if id == "404"));
    }

    #[tokio::test]
    async fn test_delete_reports_rows_affected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                },
            ])
            .into_connection();
        let repo = PgProductRepository::new(db);

        assert!(repo.delete(1).await.unwrap());
        assert!(!repo.delete(1).await.unwrap());
    }

    #[tokio::test]
    async fn test_database_errors_become_internal() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([sea_orm::DbErr::Custom("boom".into())])
            .into_connection();
        let repo = PgProductRepository::new(db);

        let err = repo.list().await.unwrap_err();
        assert!(matches!(err, ProductError::Internal(msg) if msg.contains("boom")));
    }
}
