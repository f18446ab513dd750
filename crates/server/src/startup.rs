use std::{future::Future, net::SocketAddr};

use configs::{AppConfig, StorageBackend};
use migration::{Migrator, MigratorTrait};
use service::catalog::memory::InMemoryCatalog;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::{
    routes,
    state::{PagingDefaults, ServerState},
};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", cfg.server.host, cfg.server.port).parse()?)
}

/// Wire repositories for the configured storage backend.
pub async fn build_state(cfg: &AppConfig) -> anyhow::Result<ServerState> {
    let paging = PagingDefaults::from(&cfg.catalog);
    match cfg.catalog.storage {
        StorageBackend::Memory => {
            warn!(event = "storage_memory", "using in-memory catalog; data is lost on restart");
            Ok(ServerState::in_memory(&InMemoryCatalog::seeded(), paging))
        }
        StorageBackend::Postgres => {
            let db = models::db::connect_with_config(&cfg.database).await?;
            if cfg.catalog.run_migrations {
                Migrator::up(&db, None).await?;
                info!(event = "migrations_applied", "database schema is up to date");
            }
            Ok(ServerState::postgres(db, paging))
        }
    }
}

/// Serve the catalog on an already bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: ServerState, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = routes::build_router(state, build_cors());
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

/// Public entry: build the app and run the HTTP server
pub async fn run<F>(cfg: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let state = build_state(&cfg).await?;
    let addr = bind_addr(&cfg)?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, storage = ?cfg.catalog.storage, "catalog server listening");
    serve(listener, state, shutdown).await?;
    info!("catalog server stopped");
    Ok(())
}
