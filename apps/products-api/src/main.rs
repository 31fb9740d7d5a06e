//! Products API - REST server for the product inventory

use axum_helpers::server::create_production_app;
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_products::{InMemoryProductRepository, LocalImageStorage};
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::{AppState, ProductStore};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    let store = match &config.database {
        Some(database) => {
            let db = database::postgres::connect_from_config_with_retry(
                database.clone(),
                Some(config.retry.clone()),
            )
            .await
            .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;

            if config.run_migrations {
                database::postgres::run_migrations::<migration::Migrator>(&db, config.app.name)
                    .await?;
            }
            if config.seed_database {
                migration::seed_demo_products(&db).await?;
            }

            ProductStore::Postgres(db)
        }
        None => {
            tracing::warn!("Using the in-memory product repository; data is lost on restart");
            let repository = InMemoryProductRepository::new();
            if config.seed_database {
                seed_memory(&repository).await?;
            }
            ProductStore::Memory(repository)
        }
    };

    tokio::fs::create_dir_all(config.storage.root.join("products")).await?;
    info!(root = %config.storage.root.display(), "Serving product images");

    let images = LocalImageStorage::new(&config.storage.root, config.storage.public_url.clone());

    let state = AppState {
        config,
        store,
        images,
    };

    let app = api::app(&state).await?;

    let AppState { config, store, .. } = state;

    info!(
        repository = %config.repository,
        "Starting Products API with graceful shutdown (30s timeout)"
    );

    create_production_app(
        app,
        &config.server,
        Duration::from_secs(30),
        async move {
            if let ProductStore::Postgres(db) = store {
                info!("Shutting down: closing database connections");
                match db.close().await {
                    Ok(_) => info!("PostgreSQL connection closed successfully"),
                    Err(e) => tracing::error!("Error closing PostgreSQL: {}", e),
                }
            }
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Products API shutdown complete");
    Ok(())
}

/// Load the demo inventory into a fresh in-memory repository
async fn seed_memory(repository: &InMemoryProductRepository) -> eyre::Result<()> {
    use domain_products::{CreateProduct, ProductRepository};

    for (name, description, price, stock) in migration::seed::DEMO_PRODUCTS {
        repository
            .create(CreateProduct {
                name: name.to_string(),
                description: Some(description.to_string()),
                price,
                stock,
                image: None,
            })
            .await?;
    }

    info!(count = migration::seed::DEMO_PRODUCTS.len(), "Seeded demo products");
    Ok(())
}
