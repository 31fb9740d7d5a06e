//! HTTP handlers for Products API

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    routing::get,
};
use axum_helpers::{
    ApiResponse, Enveloped, MessageResponse,
    errors::responses::{
        BadRequestResponse, InternalServerErrorResponse, MessageBody, NotFoundResponse,
        PayloadTooLargeResponse, ValidationBody, ValidationErrorResponse,
    },
};
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};

use crate::error::{ProductError, ProductResult};
use crate::extract::{ProductForm, ProductId};
use crate::models::ProductResponse;
use crate::repository::ProductRepository;
use crate::service::ProductService;
use crate::storage::ImageStorage;

pub const TAG: &str = "Products";

/// Request bodies may carry an image of up to 2048 KB plus form overhead;
/// oversized images are reported as a validation error, not a 413.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Multipart form accepted by create and update
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct ProductUpload {
    #[schema(example = "Mouse Logitech G502", max_length = 255)]
    name: String,
    description: Option<String>,
    #[schema(example = 850000, minimum = 0)]
    price: f64,
    #[schema(example = 50, minimum = 0)]
    stock: i64,
    /// jpeg, png, jpg, gif or webp; at most 2048 KB
    #[schema(value_type = Option<String>, format = Binary)]
    image: Option<Vec<u8>>,
    /// `PUT` or `PATCH` when updating through `POST /{id}`
    #[schema(rename = "_method")]
    method: Option<String>,
}

/// OpenAPI documentation for Products API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        create_product,
        get_product,
        update_product,
        update_product_via_post,
        delete_product,
    ),
    components(
        schemas(ProductResponse, ProductUpload, MessageBody, ValidationBody),
        responses(
            NotFoundResponse,
            ValidationErrorResponse,
            BadRequestResponse,
            PayloadTooLargeResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Product inventory endpoints")
    )
)]
pub struct ApiDoc;

type Shared<R, S> = State<Arc<ProductService<R, S>>>;

/// Create the products router with all HTTP endpoints
pub fn router<R, S>(service: ProductService<R, S>) -> Router
where
    R: ProductRepository + 'static,
    S: ImageStorage + 'static,
{
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{id}",
            get(get_product)
                .put(update_product)
                .patch(update_product)
                .post(update_product_via_post)
                .delete(delete_product),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(shared_service)
}

/// List all products, newest first
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    responses(
        (status = 200, description = "All products", body = ApiResponse<Vec<ProductResponse>>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R: ProductRepository, S: ImageStorage>(
    State(service): Shared<R, S>,
) -> ProductResult<Json<ApiResponse<Vec<ProductResponse>>>> {
    let products = service
        .list_products()
        .await?
        .into_iter()
        .map(|product| service.present(product))
        .collect();

    Ok(Json(ApiResponse::ok(products)))
}

/// Create a product, optionally with an image
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body(content = ProductUpload, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Product created successfully", body = ApiResponse<ProductResponse>),
        (status = 400, response = BadRequestResponse),
        (status = 413, response = PayloadTooLargeResponse),
        (status = 422, response = ValidationErrorResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<R: ProductRepository, S: ImageStorage>(
    State(service): Shared<R, S>,
    ProductForm(submission): ProductForm,
) -> ProductResult<Enveloped<ProductResponse>> {
    let product = service.create_product(submission).await?;

    Ok(Enveloped(
        StatusCode::CREATED,
        ApiResponse::ok_with_message("Product created successfully", service.present(product)),
    ))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product found", body = ApiResponse<ProductResponse>),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<R: ProductRepository, S: ImageStorage>(
    State(service): Shared<R, S>,
    ProductId(id): ProductId,
) -> ProductResult<Json<ApiResponse<ProductResponse>>> {
    let product = service.get_product(id).await?;
    Ok(Json(ApiResponse::ok(service.present(product))))
}

/// Replace a product's fields; a new image replaces the stored one
#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    request_body(content = ProductUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Product updated successfully", body = ApiResponse<ProductResponse>),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 413, response = PayloadTooLargeResponse),
        (status = 422, response = ValidationErrorResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<R: ProductRepository, S: ImageStorage>(
    State(service): Shared<R, S>,
    ProductId(id): ProductId,
    ProductForm(submission): ProductForm,
) -> ProductResult<Json<ApiResponse<ProductResponse>>> {
    let product = service.update_product(id, submission).await?;

    Ok(Json(ApiResponse::ok_with_message(
        "Product updated successfully",
        service.present(product),
    )))
}

/// Update through an HTML form that sets `_method=PUT` (or `PATCH`)
#[utoipa::path(
    post,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    request_body(content = ProductUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Product updated successfully", body = ApiResponse<ProductResponse>),
        (status = 404, response = NotFoundResponse),
        (status = 405, description = "Missing or unsupported `_method`", body = MessageBody),
        (status = 422, response = ValidationErrorResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product_via_post<R: ProductRepository, S: ImageStorage>(
    state: Shared<R, S>,
    id: ProductId,
    ProductForm(submission): ProductForm,
) -> ProductResult<Json<ApiResponse<ProductResponse>>> {
    match submission.method_override.as_deref() {
        Some("PUT") | Some("PATCH") => update_product(state, id, ProductForm(submission)).await,
        other => Err(ProductError::MethodNotAllowed(
            other.unwrap_or("POST").to_string(),
        )),
    }
}

/// Delete a product and its image
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product deleted successfully", body = MessageBody),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<R: ProductRepository, S: ImageStorage>(
    State(service): Shared<R, S>,
    ProductId(id): ProductId,
) -> ProductResult<Json<MessageResponse>> {
    service.delete_product(id).await?;
    Ok(Json(MessageResponse::message("Product deleted successfully")))
}
