use axum::{Router, routing::get};
use axum_helpers::server::health_router;
use axum_helpers::{create_cors_layer, parse_origins};
use std::io;
use tower_http::services::ServeDir;

pub mod health;
pub mod products;

use crate::openapi::ApiDoc;
use crate::state::AppState;

/// The whole application: `/api`, docs, `/health`, `/ready` and `/storage`,
/// all behind the shared middleware stack
pub async fn app(state: &AppState) -> io::Result<Router> {
    let root = health_router(state.config.app)
        .merge(ready_router(state.clone()))
        .merge(storage_router(state));
    let cors = create_cors_layer(parse_origins(&state.config.cors_allowed_origin));

    axum_helpers::create_router::<ApiDoc>(routes(state), root, cors).await
}

/// API routes without the `/api` prefix; `create_router` adds it.
pub fn routes(state: &AppState) -> Router {
    Router::new().nest("/products", products::router(state))
}

/// `/ready` with real dependency checks
pub fn ready_router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}

/// Uploaded images, read-only, at the path `STORAGE_PUBLIC_URL` points to
pub fn storage_router(state: &AppState) -> Router {
    Router::new().nest_service("/storage", ServeDir::new(state.images.root()))
}
