//! Products Domain
//!
//! Product inventory: validation, persistence, image storage and HTTP
//! handlers.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints + extractors
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Validation, image lifecycle
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┬──────────────┐
//! │ Repository  │ ImageStorage │  ← Data access (traits + Postgres/disk/in-memory)
//! └──────┬──────┴──────────────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, DTOs, field rules
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_products::{
//!     handlers,
//!     repository::InMemoryProductRepository,
//!     service::ProductService,
//!     storage::InMemoryImageStorage,
//! };
//!
//! let repository = InMemoryProductRepository::new();
//! let images = InMemoryImageStorage::new("http://localhost:8080/storage");
//! let service = ProductService::new(repository, images);
//!
//! // Mount under /api/products
//! let router = handlers::router(service);
//! ```

pub mod entity;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod image;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;
pub mod storage;

// Re-export commonly used types
pub use error::{ProductError, ProductResult};
pub use extract::{ProductForm, ProductId};
pub use handlers::ApiDoc;
pub use image::ImageKind;
pub use models::{
    CreateProduct, FormValue, Product, ProductFields, ProductResponse, ProductSubmission,
    UpdateProduct,
};
pub use postgres::PgProductRepository;
pub use repository::{InMemoryProductRepository, ProductRepository};
pub use service::ProductService;
pub use storage::{
    ImageStorage, InMemoryImageStorage, LocalImageStorage, StorageError, image_url,
};
