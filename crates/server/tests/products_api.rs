use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use server::{
    routes::build_router,
    state::{PagingDefaults, ServerState},
};
use service::catalog::memory::InMemoryCatalog;
use tower::ServiceExt;
use tower_http::cors::CorsLayer;

const EXISTING_ID: i64 = 1;
const NON_EXISTING_ID: i64 = 1000;
const DEPENDENT_ID: i64 = 4;

fn app() -> (InMemoryCatalog, Router) {
    let catalog = InMemoryCatalog::seeded();
    let state = ServerState::in_memory(&catalog, PagingDefaults { default_size: 12, max_size: 100 });
    (catalog, build_router(state, CorsLayer::very_permissive()))
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Option<String>, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            req = req.header(header::CONTENT_TYPE, "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    let resp = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
    let status = resp.status();
    let location = resp
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap_or(Value::Null) };
    (status, location, json)
}

fn product_body() -> Value {
    json!({
        "name": "Phone",
        "description": "Good phone",
        "price": 800.0,
        "imgUrl": "https://img.com/img.png",
        "date": "2020-07-13T20:50:07Z",
        "categories": [{"id": 2}]
    })
}

#[tokio::test]
async fn find_all_returns_page() {
    let (_, app) = app();
    let (status, _, body) = call(&app, Method::GET, "/products", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalElements"], 4);
    assert_eq!(body["size"], 12);
    assert_eq!(body["content"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn find_all_honours_page_size_and_sort() {
    let (_, app) = app();
    let (status, _, body) = call(&app, Method::GET, "/products?page=0&size=2&sort=price,desc", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"][0]["name"], "Smart TV");
    assert_eq!(body["content"][1]["name"], "Macbook Pro");
    assert_eq!(body["totalPages"], 2);
    assert_eq!(body["first"], true);
    assert_eq!(body["last"], false);
}

#[tokio::test]
async fn find_all_rejects_unknown_sort_property() {
    let (_, app) = app();
    let (status, _, body) = call(&app, Method::GET, "/products?sort=weight", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["path"], "/products");
}

#[tokio::test]
async fn find_by_id_returns_product_when_id_exists() {
    let (_, app) = app();
    let (status, _, body) = call(&app, Method::GET, &format!("/products/{EXISTING_ID}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], EXISTING_ID);
    assert!(body["name"].is_string());
    assert!(body["description"].is_string());
    assert_eq!(body["categories"][0]["name"], "Books");
}

#[tokio::test]
async fn find_by_id_returns_not_found_when_id_does_not_exist() {
    let (_, app) = app();
    let (status, _, body) = call(&app, Method::GET, &format!("/products/{NON_EXISTING_ID}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], 404);
    assert_eq!(body["error"], "Resource not found");
    assert_eq!(body["path"], format!("/products/{NON_EXISTING_ID}"));
}

#[tokio::test]
async fn insert_returns_created_with_location() {
    let (_, app) = app();
    let (status, location, body) = call(&app, Method::POST, "/products", Some(product_body())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 5);
    assert_eq!(body["name"], "Phone");
    assert_eq!(body["description"], "Good phone");
    assert_eq!(location.as_deref(), Some("/products/5"));

    let (status, _, _) = call(&app, Method::GET, "/products/5", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn insert_rejects_invalid_body_without_saving() {
    let (catalog, app) = app();
    let mut body = product_body();
    body["price"] = json!(-1.0);
    let (status, _, err) = call(&app, Method::POST, "/products", Some(body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(err["status"], 422);
    assert_eq!(catalog.product_calls().save, 0);
}

#[tokio::test]
async fn insert_with_unknown_category_is_not_found() {
    let (_, app) = app();
    let mut body = product_body();
    body["categories"] = json!([{"id": NON_EXISTING_ID}]);
    let (status, _, _) = call(&app, Method::POST, "/products", Some(body)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_returns_product_when_id_exists() {
    let (_, app) = app();
    let (status, _, body) =
        call(&app, Method::PUT, &format!("/products/{EXISTING_ID}"), Some(product_body())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], EXISTING_ID);
    assert_eq!(body["name"], "Phone");
    assert_eq!(body["categories"][0]["name"], "Electronics");
}

#[tokio::test]
async fn update_returns_not_found_when_id_does_not_exist() {
    let (_, app) = app();
    let (status, _, _) =
        call(&app, Method::PUT, &format!("/products/{NON_EXISTING_ID}"), Some(product_body())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_returns_no_content_when_id_exists() {
    let (catalog, app) = app();
    let (status, _, body) = call(&app, Method::DELETE, &format!("/products/{EXISTING_ID}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);
    assert_eq!(catalog.product_calls().delete_by_id, 1);

    let (status, _, _) = call(&app, Method::GET, &format!("/products/{EXISTING_ID}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_returns_not_found_when_id_does_not_exist() {
    let (_, app) = app();
    let (status, _, _) = call(&app, Method::DELETE, &format!("/products/{NON_EXISTING_ID}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_returns_bad_request_when_product_is_referenced() {
    let (catalog, app) = app();
    catalog.hold_reference(DEPENDENT_ID);
    let (status, _, body) = call(&app, Method::DELETE, &format!("/products/{DEPENDENT_ID}"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Database exception");

    catalog.release_reference(DEPENDENT_ID);
    let (status, _, _) = call(&app, Method::DELETE, &format!("/products/{DEPENDENT_ID}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn category_endpoints() {
    let (_, app) = app();
    let (status, _, body) = call(&app, Method::GET, "/categories?sort=name", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"][0]["name"], "Books");

    let (status, location, body) = call(&app, Method::POST, "/categories", Some(json!({"name": "Garden"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(location.as_deref(), Some("/categories/4"));
    assert_eq!(body["id"], 4);

    let (status, _, body) = call(&app, Method::PUT, "/categories/4", Some(json!({"name": "Garden Tools"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Garden Tools");

    let (status, _, _) = call(&app, Method::DELETE, "/categories/3", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _, _) = call(&app, Method::DELETE, "/categories/4", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _, _) = call(&app, Method::GET, "/categories/4", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_metrics_and_docs() {
    let (_, app) = app();
    let (status, _, body) = call(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, _, doc) = call(&app, Method::GET, "/api-docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/products/{id}"].is_object());

    let _ = call(&app, Method::GET, "/products/1", None).await;
    let resp = app
        .clone()
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let text = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8_lossy(&text);
    assert!(text.contains("dscatalog_operations_total"));
    assert!(text.contains("dscatalog_http_requests_total"));
}

#[tokio::test]
async fn find_all_rejects_page_beyond_addressable_offset() {
    let (_, app) = app();
    let (status, _, body) = call(&app, Method::GET, "/products?page=18446744073709551615", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
    assert_eq!(body["path"], "/products");

    let (status, _, body) = call(&app, Method::GET, "/products?page=1000", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["empty"], true);
    assert_eq!(body["last"], true);
}

#[tokio::test]
async fn malformed_id_answers_with_json_error() {
    let (_, app) = app();
    let (status, _, body) = call(&app, Method::GET, "/products/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
    assert_eq!(body["error"], "Bad request");
    assert_eq!(body["path"], "/products/abc");
    assert!(body["timestamp"].is_string());

    let (status, _, body) = call(&app, Method::DELETE, "/categories/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["path"], "/categories/abc");
}

#[tokio::test]
async fn malformed_query_answers_with_json_error() {
    let (_, app) = app();
    let (status, _, body) = call(&app, Method::GET, "/products?page=-1", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
    assert_eq!(body["path"], "/products");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn incomplete_body_answers_with_json_error() {
    let (catalog, app) = app();
    let (status, _, body) = call(&app, Method::POST, "/products", Some(json!({"name": "x"}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["status"], 422);
    assert_eq!(body["error"], "Validation exception");
    assert_eq!(body["path"], "/products");
    assert_eq!(catalog.product_calls().save, 0);
}

#[tokio::test]
async fn oversized_image_url_is_rejected() {
    let (catalog, app) = app();
    let mut body = product_body();
    body["imgUrl"] = json!(format!("https://img.com/{}", "a".repeat(600)));
    let (status, _, err) = call(&app, Method::POST, "/products", Some(body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(err["error"], "Validation exception");
    assert_eq!(catalog.product_calls().save, 0);
}
