//! # Axum Helpers
//!
//! Shared building blocks for the HTTP services in this workspace.
//!
//! ## Modules
//!
//! - **[`envelope`]**: the `{ success, data, message, errors }` response body
//! - **[`errors`]**: `AppError`, error codes and OpenAPI response types
//! - **[`http`]**: CORS and security header middleware
//! - **[`server`]**: router assembly, health checks, graceful shutdown
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum_helpers::{create_cors_layer, create_production_app, create_router, parse_origins};
//!
//! let cors = create_cors_layer(parse_origins("http://localhost:3000"));
//! let router = create_router::<ApiDoc>(api_routes, Router::new(), cors).await?;
//! create_production_app(router, &config.server, Duration::from_secs(30), async {}).await?;
//! ```

pub mod envelope;
pub mod errors;
pub mod http;
pub mod server;

pub use envelope::{ApiResponse, Enveloped, FieldErrors, MessageResponse};

pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_production_app, create_router,
    health_router, run_health_checks,
};

pub use http::{create_cors_layer, create_permissive_cors_layer, parse_origins, security_headers};

pub use errors::{AppError, ErrorCode};
