//! Application state management

use database::postgres::DatabaseConnection;
use domain_products::{InMemoryProductRepository, LocalImageStorage};

/// Backing store for product rows
#[derive(Clone)]
pub enum ProductStore {
    Postgres(DatabaseConnection),
    Memory(InMemoryProductRepository),
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    pub store: ProductStore,
    pub images: LocalImageStorage,
}

impl AppState {
    pub fn database(&self) -> Option<&DatabaseConnection> {
        match &self.store {
            ProductStore::Postgres(db) => Some(db),
            ProductStore::Memory(_) => None,
        }
    }
}
