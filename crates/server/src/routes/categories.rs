use axum::{
    extract::{OriginalUri, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use service::{
    catalog::dto::CategoryDto,
    pagination::{Page, Pagination},
};

use crate::{
    errors::JsonApiError,
    extract::{ApiJson, ApiPath, ApiQuery},
    metrics::record,
    state::ServerState,
};

#[utoipa::path(
    get, path = "/categories", tag = "categories",
    params(
        ("page" = Option<u64>, Query, description = "0-based page index"),
        ("size" = Option<u64>, Query, description = "Items per page"),
        ("sort" = Option<String>, Query, description = "property[,asc|desc]; one of id, name")
    ),
    responses(
        (status = 200, description = "Page of categories", body = crate::openapi::CategoryPageDoc),
        (status = 400, description = "Malformed paging or sort", body = crate::openapi::ErrorBody)
    )
)]
pub async fn find_all(
    State(state): State<ServerState>,
    OriginalUri(uri): OriginalUri,
    ApiQuery(q): ApiQuery<Pagination>,
) -> Result<Json<Page<CategoryDto>>, JsonApiError> {
    let request = q
        .normalize(state.paging.default_size, state.paging.max_size)
        .map_err(|e| JsonApiError::from(e).at(uri.path()))?;
    let page = record("category", "find_all", state.categories.find_all_paged(request).await)
        .map_err(|e| JsonApiError::from(e).at(uri.path()))?;
    Ok(Json(page))
}

#[utoipa::path(
    get, path = "/categories/{id}", tag = "categories",
    params(("id" = i64, Path, description = "Category id")),
    responses(
        (status = 200, description = "Found", body = crate::openapi::CategoryDoc),
        (status = 404, description = "No category with this id", body = crate::openapi::ErrorBody)
    )
)]
pub async fn find_by_id(
    State(state): State<ServerState>,
    OriginalUri(uri): OriginalUri,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<CategoryDto>, JsonApiError> {
    let dto = record("category", "find_by_id", state.categories.find_by_id(id).await)
        .map_err(|e| JsonApiError::from(e).at(uri.path()))?;
    Ok(Json(dto))
}

#[utoipa::path(
    post, path = "/categories", tag = "categories",
    request_body = crate::openapi::CategoryDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::CategoryDoc),
        (status = 422, description = "Validation failed", body = crate::openapi::ErrorBody)
    )
)]
pub async fn insert(
    State(state): State<ServerState>,
    OriginalUri(uri): OriginalUri,
    ApiJson(input): ApiJson<CategoryDto>,
) -> Result<impl IntoResponse, JsonApiError> {
    let dto = record("category", "insert", state.categories.insert(input).await)
        .map_err(|e| JsonApiError::from(e).at(uri.path()))?;
    let location = format!("{}/{}", uri.path().trim_end_matches('/'), dto.id.unwrap_or_default());
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(dto)))
}

#[utoipa::path(
    put, path = "/categories/{id}", tag = "categories",
    params(("id" = i64, Path, description = "Category id")),
    request_body = crate::openapi::CategoryDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::CategoryDoc),
        (status = 404, description = "No category with this id", body = crate::openapi::ErrorBody),
        (status = 422, description = "Validation failed", body = crate::openapi::ErrorBody)
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    OriginalUri(uri): OriginalUri,
    ApiPath(id): ApiPath<i64>,
    ApiJson(input): ApiJson<CategoryDto>,
) -> Result<Json<CategoryDto>, JsonApiError> {
    let dto = record("category", "update", state.categories.update(id, input).await)
        .map_err(|e| JsonApiError::from(e).at(uri.path()))?;
    Ok(Json(dto))
}

#[utoipa::path(
    delete, path = "/categories/{id}", tag = "categories",
    params(("id" = i64, Path, description = "Category id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "No category with this id", body = crate::openapi::ErrorBody),
        (status = 400, description = "Category still has products", body = crate::openapi::ErrorBody)
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    OriginalUri(uri): OriginalUri,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, JsonApiError> {
    record("category", "delete", state.categories.delete(id).await)
        .map_err(|e| JsonApiError::from(e).at(uri.path()))?;
    Ok(StatusCode::NO_CONTENT)
}
