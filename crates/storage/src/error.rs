//! Storage errors.

use pathplanner_domain::PlannerError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(#[source] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),

    #[error("Query error: {0}")]
    Query(#[source] sqlx::Error),

    #[error("Row decode error: {0}")]
    Decode(String),
}

impl From<StorageError> for PlannerError {
    fn from(err: StorageError) -> Self {
        PlannerError::Database(err.to_string())
    }
}
