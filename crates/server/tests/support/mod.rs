#![allow(dead_code)]
use std::sync::Arc;

use axum::Router;
use migration::MigratorTrait;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use tower_http::cors::CorsLayer;

use server::routes::{self, auth::ServerState};
use service::file::FileService;
use service::member::service::AuthConfig;
use service::storage::MemoryFileStorage;

pub const TEST_SECRET: &str = "test-secret";
pub const MAX_UPLOAD_BYTES: usize = 64 * 1024;

pub fn cors() -> CorsLayer { CorsLayer::very_permissive() }

pub fn state_with(db: DatabaseConnection, storage: Arc<MemoryFileStorage>) -> ServerState {
    ServerState::new(db, AuthConfig::new(TEST_SECRET, 1), FileService::new(storage, MAX_UPLOAD_BYTES))
}

/// Router over a mock connection; only routes that never reach the database are usable.
pub fn offline_app() -> Router {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    routes::build_router(state_with(db, Arc::new(MemoryFileStorage::default())), cors())
}

/// Migrated database, or `None` when DB tests are skipped or Postgres is unreachable.
pub async fn test_db() -> Option<DatabaseConnection> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return None;
    }
    let db = match models::db::connect().await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("skip: cannot connect to db: {}", e);
            return None;
        }
    };
    if let Err(e) = migration::Migrator::up(&db, None).await {
        // another test binary may be migrating the same database concurrently
        let msg = e.to_string();
        if !(msg.contains("duplicate key") || msg.contains("already exists")) {
            eprintln!("skip: migrate up failed: {}", msg);
            return None;
        }
        eprintln!("migrations notice: {}", msg);
    }
    Some(db)
}
