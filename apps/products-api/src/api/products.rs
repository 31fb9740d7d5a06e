use axum::Router;
use domain_products::{PgProductRepository, ProductService, handlers};

use crate::state::{AppState, ProductStore};

pub fn router(state: &AppState) -> Router {
    let images = state.images.clone();

    match &state.store {
        ProductStore::Postgres(db) => {
            let repository = PgProductRepository::new(db.clone());
            handlers::router(ProductService::new(repository, images))
        }
        ProductStore::Memory(repository) => {
            handlers::router(ProductService::new(repository.clone(), images))
        }
    }
}
