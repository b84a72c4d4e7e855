use crate::config::parse_var;
use crate::core::{AppError, Result};
use serde::Deserialize;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_size: u32,
    pub max_connections: u32,
    /// Apply embedded migrations at startup
    pub run_migrations: bool,
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self> {
        Ok(DatabaseConfig {
            url: env::var("DATABASE_URL")
                .map_err(|_| AppError::Configuration("DATABASE_URL not set".to_string()))?,
            pool_size: parse_var("DATABASE_POOL_SIZE", "10")?,
            max_connections: parse_var("DATABASE_MAX_CONNECTIONS", "20")?,
            run_migrations: parse_var("DATABASE_RUN_MIGRATIONS", "true")?,
        })
    }

    /// Create a MySQL connection pool
    ///
    /// Applies pending migrations when `run_migrations` is set.
    pub async fn create_pool(&self) -> Result<MySqlPool> {
        let pool = MySqlPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.pool_size)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600)) // 10 minutes
            .max_lifetime(Duration::from_secs(1800)) // 30 minutes
            .test_before_acquire(true)
            .connect(&self.url)
            .await?;

        if self.run_migrations {
            sqlx::migrate!("./migrations").run(&pool).await?;
            tracing::info!("Database migrations applied");
        }

        Ok(pool)
    }
}
