//! Connection pool configuration and setup.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::error::{DbError, DbResult};

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            database_url: "postgres://localhost/vclip".to_string(),
            max_connections: 10,
            min_connections: 1,
        }
    }
}

impl DbConfig {
    /// Create config from environment variables.
    pub fn from_env() -> DbResult<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| DbError::config("DATABASE_URL is not set"))?;
        Ok(Self {
            database_url,
            max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            min_connections: std::env::var("DB_MIN_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1),
        })
    }

    pub async fn connect(&self) -> DbResult<PgPool> {
        let pool = PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .connect(&self.database_url)
            .await?;
        Ok(pool)
    }
}

/// Run embedded migrations against the given pool.
pub async fn migrate(pool: &PgPool) -> DbResult<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
