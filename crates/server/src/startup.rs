use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use dotenvy::dotenv;
use migration::MigratorTrait;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

use configs::AppConfig;
use models::db::{connect_with_config, DatabaseConfig};
use service::file::FileService;
use service::member::service::AuthConfig;
use service::runtime;
use service::storage::LocalFileStorage;

use crate::errors::StartupError;
use crate::observability;
use crate::routes::{self, auth::ServerState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &configs::ServerConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", cfg.host, cfg.port).parse()?)
}

/// Wire services from configuration onto an open connection.
pub fn build_state(db: sea_orm::DatabaseConnection, cfg: &AppConfig) -> ServerState {
    let storage = Arc::new(LocalFileStorage::new(&cfg.storage.upload_dir));
    let files = FileService::new(storage, cfg.storage.max_upload_bytes);
    let auth = AuthConfig::new(cfg.auth.jwt_secret.clone(), cfg.auth.token_ttl_hours);
    ServerState::new(db, auth, files)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl_c");
        std::future::pending::<()>().await;
    }
    info!(event = "shutdown_signal", "graceful shutdown requested");
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();

    let cfg = AppConfig::load_or_env().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    runtime::ensure_env(&cfg.storage.upload_dir)
        .await
        .map_err(|e| StartupError::Runtime(e.to_string()))?;

    // DB connection + schema
    let db = connect_with_config(&DatabaseConfig::from(&cfg.database)).await?;
    migration::Migrator::up(&db, None).await?;
    info!(event = "migrated", "database schema up to date");

    observability::init_metrics();
    let state = build_state(db, &cfg);
    let app: Router = routes::build_router(state, build_cors());

    // Bind and serve
    let addr = bind_addr(&cfg.server)?;
    info!(%addr, upload_dir = %cfg.storage.upload_dir, "starting diary server");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    Ok(())
}
