//! Storage layer for the pathway planning backend.

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

pub mod catalog_repository;
pub mod error;
pub mod reservation_repository;

pub use catalog_repository::CatalogRepository;
pub use error::StorageError;
pub use reservation_repository::ReservationRepository;

/// How long a request may wait for a pooled connection before giving up.
/// Reservation transactions hold row locks, so waiting indefinitely would
/// stack lock queues behind a saturated pool.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Open a PostgreSQL pool sized from configuration
/// (`database_max_connections`).
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, StorageError> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(database_url)
        .await
        .map_err(StorageError::Connection)
}

/// Apply pending schema migrations from the workspace migrations directory.
pub async fn run_migrations(pool: &PgPool) -> Result<(), StorageError> {
    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(StorageError::Migration)
}

/// Readiness probe for planning traffic: the catalog schema must be
/// migrated and reachable. Probes the `courses` table rather than a bare
/// `SELECT 1` so an unmigrated database reports not-ready instead of
/// failing on the first plan request.
pub async fn check_catalog_ready(pool: &PgPool) -> Result<(), StorageError> {
    sqlx::query("SELECT 1 FROM courses LIMIT 1")
        .fetch_optional(pool)
        .await
        .map_err(StorageError::Query)?;
    Ok(())
}
