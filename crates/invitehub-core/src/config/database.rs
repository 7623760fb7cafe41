//! PostgreSQL settings.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Where the stores live and how the pool is sized.
///
/// Only `url` is mandatory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "pool_max")]
    pub max_connections: u32,
    #[serde(default = "pool_min")]
    pub min_connections: u32,
    /// Seconds to wait for a free connection.
    #[serde(default = "acquire_seconds")]
    pub connect_timeout_seconds: u64,
    /// Seconds before an unused connection is dropped.
    #[serde(default = "idle_seconds")]
    pub idle_timeout_seconds: u64,
    /// Apply the embedded schema migrations at startup.
    #[serde(default = "migrate_on_start")]
    pub run_migrations: bool,
}

impl DatabaseConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.url.trim().is_empty() {
            return Err(AppError::configuration("database.url is required"));
        }
        if self.max_connections == 0 || self.min_connections > self.max_connections {
            return Err(AppError::configuration(format!(
                "database pool bounds are inconsistent: min {} / max {}",
                self.min_connections, self.max_connections
            )));
        }
        Ok(())
    }
}

fn pool_max() -> u32 {
    10
}

fn pool_min() -> u32 {
    1
}

fn acquire_seconds() -> u64 {
    5
}

fn idle_seconds() -> u64 {
    600
}

fn migrate_on_start() -> bool {
    true
}
