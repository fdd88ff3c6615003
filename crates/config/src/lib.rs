//! Configuration module for the pathway planning backend.

use serde::Deserialize;
use std::env;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} is not set and has no default")]
    Missing { name: &'static str },
    #[error("{name}={value:?} is not a valid {expected}")]
    Unparseable {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// PostgreSQL connection URL
    pub database_url: String,
    /// Connection pool size for the storage layer
    pub database_max_connections: u32,
    /// Wall-clock bound for the exact solver, in seconds
    pub solver_time_limit_seconds: u64,
    /// Worker threads for the exact solver's parallel search
    pub solver_workers: u32,
    /// Default hold window for seat reservations, in minutes
    pub reservation_hold_minutes: i64,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            database_max_connections: parsed_or("DATABASE_MAX_CONNECTIONS", 10)?,
            solver_time_limit_seconds: parsed_or("SOLVER_TIME_LIMIT_SECONDS", 20)?,
            solver_workers: parsed_or("SOLVER_WORKERS", 8)?,
            reservation_hold_minutes: parsed_or("RESERVATION_HOLD_MINUTES", 15)?,
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::Missing { name })
}

/// Parse an optional variable, keeping the offending value in the error so
/// a bad deployment names the variable instead of failing opaquely.
fn parsed_or<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    let Ok(raw) = env::var(name) else {
        return Ok(default);
    };
    raw.parse().map_err(|_| ConfigError::Unparseable {
        name,
        value: raw,
        expected: std::any::type_name::<T>(),
    })
}
