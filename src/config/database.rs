use crate::core::{AppError, Result};
use serde::Deserialize;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Connection settings for the MySQL store
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub min_connections: u32,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

/// Parse `key` from the environment, falling back to `default` when unset
fn env_or<T: FromStr>(key: &str, default: T) -> Result<T> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Configuration(format!("Invalid {}: {}", key, raw))),
        Err(_) => Ok(default),
    }
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self> {
        Ok(DatabaseConfig {
            url: env::var("DATABASE_URL")
                .map_err(|_| AppError::Configuration("DATABASE_URL not set".to_string()))?,
            min_connections: env_or("DATABASE_MIN_CONNECTIONS", 1)?,
            max_connections: env_or("DATABASE_MAX_CONNECTIONS", 5)?,
            acquire_timeout_secs: env_or("DATABASE_ACQUIRE_TIMEOUT_SECS", 30)?,
        })
    }

    /// Pool options derived from this configuration
    ///
    /// Billing only holds a connection for the length of one payment
    /// transaction, so the pool stays small and fails fast on acquire.
    pub fn pool_options(&self) -> MySqlPoolOptions {
        MySqlPoolOptions::new()
            .min_connections(self.min_connections)
            .max_connections(self.max_connections)
            .acquire_timeout(Duration::from_secs(self.acquire_timeout_secs))
    }

    /// Open the pool and bring the schema up to date
    pub async fn connect(&self) -> Result<MySqlPool> {
        let pool = self.pool_options().connect(&self.url).await?;
        tracing::debug!(
            min_connections = self.min_connections,
            max_connections = self.max_connections,
            "Database pool opened"
        );

        run_migrations(&pool).await?;
        Ok(pool)
    }
}

/// Apply the schema in `migrations/` to the pool's database
pub async fn run_migrations(pool: &MySqlPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
