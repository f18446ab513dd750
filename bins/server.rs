use configs::AppConfig;
use dotenvy::dotenv;
use tracing::{error, info};
use uuid::Uuid;

fn init_logging(cfg: Option<&AppConfig>) {
    let format = cfg
        .map(|c| common::utils::logging::LogFormat::from_name(&c.logging.format))
        .unwrap_or_default();
    common::utils::logging::init_logging(format);
    info!(service = "dscatalog", event = "logger_init", "tracing subscriber initialized");
}

fn main() -> std::process::ExitCode {
    // .env first so RUST_LOG / DATABASE_URL / CONFIG_PATH apply
    dotenv().ok();

    let cfg = AppConfig::load_or_env();
    init_logging(cfg.as_ref().ok());
    let cfg = match cfg {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(service = "dscatalog", event = "config_invalid", error = %e, "failed to load configuration");
            return std::process::ExitCode::FAILURE;
        }
    };

    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    std::panic::set_hook(Box::new(move |info| {
        error!(
            service = "dscatalog",
            event = "panic",
            %service_id,
            pid,
            message = %info,
            "unhandled panic occurred"
        );
    }));

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = cfg.server.worker_threads {
        builder.worker_threads(w);
    }
    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "dscatalog", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return std::process::ExitCode::FAILURE;
        }
    };

    info!(
        service = "dscatalog",
        event = "start",
        %service_id,
        pid,
        version,
        threads = cfg.server.worker_threads.unwrap_or_default(),
        "catalog service starting"
    );

    rt.block_on(async move {
        let shutdown = async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!(service = "dscatalog", event = "shutdown_signal", %service_id, pid, "received Ctrl+C, draining connections");
            }
        };
        match server::run(cfg, shutdown).await {
            Ok(()) => {
                info!(service = "dscatalog", event = "stop", %service_id, pid, "catalog service stopped");
                std::process::ExitCode::SUCCESS
            }
            Err(e) => {
                error!(service = "dscatalog", event = "run_failed", error = %e, "server::run returned error");
                std::process::ExitCode::FAILURE
            }
        }
    })
}
