use axum::{
    extract::{OriginalUri, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use service::{
    catalog::dto::ProductDto,
    pagination::{Page, Pagination},
};
use tracing::info;

use crate::{
    errors::JsonApiError,
    extract::{ApiJson, ApiPath, ApiQuery},
    metrics::record,
    state::ServerState,
};

#[utoipa::path(
    get, path = "/products", tag = "products",
    params(
        ("page" = Option<u64>, Query, description = "0-based page index"),
        ("size" = Option<u64>, Query, description = "Items per page"),
        ("sort" = Option<String>, Query, description = "property[,asc|desc]; one of id, name, price, date")
    ),
    responses(
        (status = 200, description = "Page of products", body = crate::openapi::ProductPageDoc),
        (status = 400, description = "Malformed paging or sort", body = crate::openapi::ErrorBody)
    )
)]
pub async fn find_all(
    State(state): State<ServerState>,
    OriginalUri(uri): OriginalUri,
    ApiQuery(q): ApiQuery<Pagination>,
) -> Result<Json<Page<ProductDto>>, JsonApiError> {
    let request = q
        .normalize(state.paging.default_size, state.paging.max_size)
        .map_err(|e| JsonApiError::from(e).at(uri.path()))?;
    let page = record("product", "find_all", state.products.find_all_paged(request).await)
        .map_err(|e| JsonApiError::from(e).at(uri.path()))?;
    Ok(Json(page))
}

#[utoipa::path(
    get, path = "/products/{id}", tag = "products",
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 200, description = "Found", body = crate::openapi::ProductDoc),
        (status = 404, description = "No product with this id", body = crate::openapi::ErrorBody)
    )
)]
pub async fn find_by_id(
    State(state): State<ServerState>,
    OriginalUri(uri): OriginalUri,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ProductDto>, JsonApiError> {
    let dto = record("product", "find_by_id", state.products.find_by_id(id).await)
        .map_err(|e| JsonApiError::from(e).at(uri.path()))?;
    Ok(Json(dto))
}

#[utoipa::path(
    post, path = "/products", tag = "products",
    request_body = crate::openapi::ProductDoc,
    responses(
        (status = 201, description = "Created; Location points at the new product", body = crate::openapi::ProductDoc),
        (status = 404, description = "A referenced category does not exist", body = crate::openapi::ErrorBody),
        (status = 422, description = "Validation failed", body = crate::openapi::ErrorBody)
    )
)]
pub async fn insert(
    State(state): State<ServerState>,
    OriginalUri(uri): OriginalUri,
    ApiJson(input): ApiJson<ProductDto>,
) -> Result<impl IntoResponse, JsonApiError> {
    let dto = record("product", "insert", state.products.insert(input).await)
        .map_err(|e| JsonApiError::from(e).at(uri.path()))?;
    let location = format!("{}/{}", uri.path().trim_end_matches('/'), dto.id.unwrap_or_default());
    info!(%location, "product_created");
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(dto)))
}

#[utoipa::path(
    put, path = "/products/{id}", tag = "products",
    params(("id" = i64, Path, description = "Product id")),
    request_body = crate::openapi::ProductDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::ProductDoc),
        (status = 404, description = "No product with this id", body = crate::openapi::ErrorBody),
        (status = 422, description = "Validation failed", body = crate::openapi::ErrorBody)
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    OriginalUri(uri): OriginalUri,
    ApiPath(id): ApiPath<i64>,
    ApiJson(input): ApiJson<ProductDto>,
) -> Result<Json<ProductDto>, JsonApiError> {
    let dto = record("product", "update", state.products.update(id, input).await)
        .map_err(|e| JsonApiError::from(e).at(uri.path()))?;
    Ok(Json(dto))
}

#[utoipa::path(
    delete, path = "/products/{id}", tag = "products",
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "No product with this id", body = crate::openapi::ErrorBody),
        (status = 400, description = "Product is still referenced", body = crate::openapi::ErrorBody)
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    OriginalUri(uri): OriginalUri,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, JsonApiError> {
    record("product", "delete", state.products.delete(id).await)
        .map_err(|e| JsonApiError::from(e).at(uri.path()))?;
    Ok(StatusCode::NO_CONTENT)
}
