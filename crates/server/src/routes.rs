use axum::{
    http::StatusCode,
    middleware,
    routing::get,
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::{metrics, openapi::ApiDoc, state::ServerState};

pub mod categories;
pub mod products;

#[utoipa::path(
    get, path = "/health", tag = "health",
    responses((status = 200, description = "Service is up", body = crate::openapi::HealthResponse))
)]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

pub async fn prometheus_metrics() -> (StatusCode, String) {
    metrics::encode_metrics()
}

/// Build the full application router: catalog resources, health, metrics and API docs.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let catalog = Router::new()
        .route("/products", get(products::find_all).post(products::insert))
        .route(
            "/products/:id",
            get(products::find_by_id).put(products::update).delete(products::delete),
        )
        .route("/categories", get(categories::find_all).post(categories::insert))
        .route(
            "/categories/:id",
            get(categories::find_by_id).put(categories::update).delete(categories::delete),
        );

    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(prometheus_metrics))
        .merge(catalog)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(middleware::from_fn(metrics::track_requests))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
