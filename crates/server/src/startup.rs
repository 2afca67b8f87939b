use std::net::SocketAddr;

use axum::Router;
use configs::{AppConfig, ServerConfig};
use migration::MigratorTrait;
use service::training::TrainingStore;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes;
use crate::state::ServerState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(server: &ServerConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", server.host, server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("server address: {e}")))
}

/// Connect the store, bring the schema up to date and build the router.
pub async fn build_app(cfg: &AppConfig) -> Result<Router, StartupError> {
    common::env::ensure_env(
        &cfg.server.static_dir,
        common::env::sqlite_file_from_url(&cfg.database.connection_url()),
    )
    .await?;

    let store = TrainingStore::connect(&cfg.database)
        .await
        .map_err(|e| StartupError::Runtime(e.to_string()))?;
    migration::Migrator::up(store.connection(), None)
        .await
        .map_err(|e| StartupError::Runtime(format!("migrations failed: {e}")))?;
    info!(
        event = "schema_ready",
        host = %cfg.database.host,
        database = %cfg.database.database,
        "database schema up to date"
    );

    Ok(routes::build_router(ServerState { store }, &cfg.server, build_cors()))
}

/// Serve with an already loaded configuration until Ctrl+C.
pub async fn run_with_config(cfg: AppConfig) -> Result<(), StartupError> {
    let app = build_app(&cfg).await?;
    let addr = bind_addr(&cfg.server)?;
    info!(%addr, body_limit_bytes = cfg.server.body_limit_bytes, "starting server");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| StartupError::Runtime(format!("bind {addr}: {e}")))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| StartupError::Any(e.into()))?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!(event = "shutdown_signal", "received Ctrl+C, draining connections");
}
