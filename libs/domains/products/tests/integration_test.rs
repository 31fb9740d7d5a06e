//! Integration tests for Products domain
//!
//! These tests use real PostgreSQL via testcontainers to ensure:
//! - The migrated schema matches the entity
//! - Ordering and id assignment come from the database
//! - Updates bump `updated_at` and keep the image key when none is given
//!
//! They need Docker, so they are ignored by default:
//! `cargo test -p domain_products -- --ignored`

use domain_products::*;
use test_utils::{TestDataBuilder, TestDatabase, assertions::*};

fn input(name: String) -> CreateProduct {
    CreateProduct {
        name,
        description: Some("Integration test product".to_string()),
        price: 1100000.0,
        stock: 25,
        image: None,
    }
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_create_and_get_product() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("create_and_get");

    let created = repo
        .create(CreateProduct {
            price: builder.price(),
            stock: builder.stock(),
            ..input(builder.name("product", "main"))
        })
        .await
        .unwrap();
    assert!(created.id > 0);
    assert_price_eq(created.price, builder.price(), "stored price");
    assert_eq!(created.stock, builder.stock());

    let retrieved = repo.get_by_id(created.id).await.unwrap();
    let retrieved = assert_some(retrieved, "product should exist");
    assert_eq!(retrieved.name, created.name);
    assert_eq!(retrieved.description, created.description);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_ids_are_unique_and_list_is_newest_first() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("list_order");

    let first = repo.create(input(builder.name("product", "first"))).await.unwrap();
    let second = repo.create(input(builder.name("product", "second"))).await.unwrap();
    assert_ne!(first.id, second.id);

    let listed = repo.list().await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, second.id);
    assert_eq!(listed[1].id, first.id);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_update_keeps_image_when_not_replaced() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("update_keeps_image");

    let created = repo
        .create(CreateProduct {
            image: Some("products/1718000000_3f2a9c1e_mouse.png".to_string()),
            ..input(builder.name("product", "img"))
        })
        .await
        .unwrap();

    let updated = repo
        .update(
            created.id,
            UpdateProduct {
                name: builder.name("product", "renamed"),
                description: None,
                price: 0.0,
                stock: 0,
                image: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.image, created.image);
    assert_eq!(updated.description, None);
    assert_eq!(updated.stock, 0);
    assert!(updated.updated_at >= created.updated_at);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_delete_product() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("delete");

    let created = repo.create(input(builder.name("product", "gone"))).await.unwrap();

    assert!(repo.delete(created.id).await.unwrap());
    assert_none(repo.get_by_id(created.id).await.unwrap(), "product should be gone");
    assert!(!repo.delete(created.id).await.unwrap());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_service_round_trip_with_disk_storage() {
    let db = TestDatabase::new().await;
    let dir = tempfile::tempdir().unwrap();
    let images = LocalImageStorage::new(dir.path(), "http://localhost:8080/storage");
    let service = ProductService::new(PgProductRepository::new(db.connection()), images.clone());

    let created = service
        .create_product(
            ProductSubmission::default()
                .text("name", "Mouse Logitech G502")
                .text("price", "850000")
                .text("stock", "50")
                .with_image(Some("mouse.png"), b"\x89PNG\r\n\x1a\n\0\0".to_vec()),
        )
        .await
        .unwrap();

    let key = created.image.clone().unwrap();
    assert!(images.exists(&key).await.unwrap());

    service.delete_product(created.id).await.unwrap();
    assert!(!images.exists(&key).await.unwrap());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_seeded_products_are_listed() {
    let db = TestDatabase::new().await;
    assert_eq!(db.seed().await, 5);

    let repo = PgProductRepository::new(db.connection());
    let listed = repo.list().await.unwrap();
    assert_eq!(listed.len(), 5);
    assert!(listed.iter().any(|p| p.name == "Mouse Logitech G502" && p.stock == 50));
}
