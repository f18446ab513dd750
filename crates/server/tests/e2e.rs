use std::net::SocketAddr;

use migration::MigratorTrait;
use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use server::state::{PagingDefaults, ServerState};
use service::catalog::memory::InMemoryCatalog;
use tokio::{net::TcpListener, sync::oneshot};
use uuid::Uuid;

const PAGING: PagingDefaults = PagingDefaults { default_size: 12, max_size: 100 };

struct TestApp {
    base_url: String,
    stop: Option<oneshot::Sender<()>>,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(tx) = self.stop.take() {
            let _ = tx.send(());
        }
    }
}

async fn start_server(state: ServerState) -> anyhow::Result<TestApp> {
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let (tx, rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        let shutdown = async move {
            let _ = rx.await;
        };
        if let Err(e) = server::startup::serve(listener, state, shutdown).await {
            eprintln!("server error: {}", e);
        }
    });
    Ok(TestApp { base_url: format!("http://{}:{}", addr.ip(), addr.port()), stop: Some(tx) })
}

async fn postgres_state() -> Option<ServerState> {
    if std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err() {
        eprintln!("DATABASE_URL missing; skip postgres e2e test");
        return None;
    }
    let db = models::db::connect().await.ok()?;
    if let Err(e) = migration::Migrator::up(&db, None).await {
        eprintln!("migrations notice: {}", e);
    }
    Some(ServerState::postgres(db, PAGING))
}

/// Create, read, update and delete one product over real HTTP.
async fn product_lifecycle(app: &TestApp) -> anyhow::Result<()> {
    let client = reqwest::Client::new();
    let name = format!("Phone {}", &Uuid::new_v4().simple().to_string()[..8]);

    let resp = client
        .post(format!("{}/products", app.base_url))
        .json(&json!({
            "name": name,
            "description": "Good phone",
            "price": 800.0,
            "imgUrl": "https://img.com/img.png",
            "categories": [{"id": 1}]
        }))
        .send()
        .await?;
    assert_eq!(resp.status(), HttpStatusCode::CREATED);
    let location = resp
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_default();
    let created: Value = resp.json().await?;
    let id = created["id"].as_i64().unwrap_or_default();
    assert!(id > 0);
    assert_eq!(location, format!("/products/{id}"));

    let resp = client.get(format!("{}/products/{id}", app.base_url)).send().await?;
    assert_eq!(resp.status(), HttpStatusCode::OK);
    let fetched: Value = resp.json().await?;
    assert_eq!(fetched["name"], name.as_str());

    let resp = client
        .put(format!("{}/products/{id}", app.base_url))
        .json(&json!({"name": "Updated phone", "description": "Better phone", "price": 900.0, "categories": []}))
        .send()
        .await?;
    assert_eq!(resp.status(), HttpStatusCode::OK);
    let updated: Value = resp.json().await?;
    assert_eq!(updated["price"], 900.0);
    assert_eq!(updated["categories"], json!([]));

    let resp = client.delete(format!("{}/products/{id}", app.base_url)).send().await?;
    assert_eq!(resp.status(), HttpStatusCode::NO_CONTENT);
    let resp = client.delete(format!("{}/products/{id}", app.base_url)).send().await?;
    assert_eq!(resp.status(), HttpStatusCode::NOT_FOUND);
    let body: Value = resp.json().await?;
    assert_eq!(body["path"], format!("/products/{id}"));
    Ok(())
}

#[tokio::test]
async fn e2e_health_and_docs() -> anyhow::Result<()> {
    let app = start_server(ServerState::in_memory(&InMemoryCatalog::seeded(), PAGING)).await?;
    let client = reqwest::Client::new();

    let resp = client.get(format!("{}/health", app.base_url)).send().await?;
    assert_eq!(resp.status(), HttpStatusCode::OK);
    let body: Value = resp.json().await?;
    assert_eq!(body["status"], "ok");

    let resp = client.get(format!("{}/api-docs/openapi.json", app.base_url)).send().await?;
    assert_eq!(resp.status(), HttpStatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn e2e_product_lifecycle_in_memory() -> anyhow::Result<()> {
    let app = start_server(ServerState::in_memory(&InMemoryCatalog::seeded(), PAGING)).await?;
    product_lifecycle(&app).await
}

#[tokio::test]
async fn e2e_product_lifecycle_postgres() -> anyhow::Result<()> {
    let Some(state) = postgres_state().await else { return Ok(()) };
    let app = start_server(state).await?;
    product_lifecycle(&app).await?;

    // seeded category 3 still has products
    let resp = reqwest::Client::new().delete(format!("{}/categories/3", app.base_url)).send().await?;
    assert_eq!(resp.status(), HttpStatusCode::BAD_REQUEST);
    Ok(())
}
