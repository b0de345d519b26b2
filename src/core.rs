//! Core pgtable functionality
//!
//! This module contains the `Database` entry point: the connection pool and
//! the transactions table operations run in.

use sqlx::{PgPool, Postgres, Transaction};
use std::time::Duration;

use crate::errors::DatabaseError;
use config::DatabaseConfig;

/// Connection pool shared by every table of an application
#[derive(Debug, Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create new Database with a validated connection configuration
    pub async fn new(config: DatabaseConfig) -> Result<Self, DatabaseError> {
        config.validate()?;
        let connection_string = config.connection_string();

        let mut pool_options = sqlx::postgres::PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds));

        // Set max lifetime if specified
        if config.max_lifetime_seconds > 0 {
            pool_options =
                pool_options.max_lifetime(Duration::from_secs(config.max_lifetime_seconds));
        }

        let pool = pool_options.connect(&connection_string).await?;
        debug_log!(
            host = %config.host,
            database = %config.database,
            "Connected to database"
        );

        Ok(Self { pool })
    }

    /// Connect with default pool settings, e.g. from `DATABASE_URL`
    pub async fn connect(url: &str) -> Result<Self, DatabaseError> {
        let pool = PgPool::connect(url).await?;
        Ok(Self { pool })
    }

    /// Wrap an existing pool
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get database pool reference
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Begin a transaction; pass `&mut *tx` to table operations
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, DatabaseError> {
        Ok(self.pool.begin().await?)
    }

    /// Check database connection health
    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}
