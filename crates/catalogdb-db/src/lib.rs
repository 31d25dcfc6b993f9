use std::time::Duration;

use catalogdb_core::{AppConfig, ConfigError};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use thiserror::Error;

pub mod products;

pub use products::{
    count_products, create_products_table, insert_products, list_products, ProductRow,
};

const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout_secs: DEFAULT_ACQUIRE_TIMEOUT_SECS,
        }
    }
}

/// Connection parameters for the products database.
#[derive(Clone)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: Option<String>,
    pub pool: PoolConfig,
}

impl DbConfig {
    /// Derives database settings from the application config.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Config`] if `PGDATABASE` or `PGUSER` is unset.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, DbError> {
        Ok(Self {
            host: config.pg_host.clone(),
            port: config.pg_port,
            database: config.require_pg_database()?.to_owned(),
            user: config.require_pg_user()?.to_owned(),
            password: config.pg_password.clone(),
            pool: PoolConfig {
                max_connections: config.db_max_connections,
                acquire_timeout_secs: config.db_acquire_timeout_secs,
            },
        })
    }

    fn connect_options(&self) -> PgConnectOptions {
        let options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.database)
            .username(&self.user);
        match &self.password {
            Some(password) => options.password(password),
            None => options,
        }
    }
}

impl std::fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "[redacted]"))
            .field("pool", &self.pool)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum DbError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Connect to a Postgres pool using explicit settings.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the connection cannot be established.
pub async fn connect_pool(config: &DbConfig) -> Result<PgPool, sqlx::Error> {
    tracing::debug!(
        host = %config.host,
        port = config.port,
        database = %config.database,
        "connecting to postgres"
    );
    PgPoolOptions::new()
        .max_connections(config.pool.max_connections)
        .acquire_timeout(Duration::from_secs(config.pool.acquire_timeout_secs))
        .connect_with(config.connect_options())
        .await
}

/// Send a `SELECT 1` to verify the pool has a live connection.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool)
        .await?;
    Ok(())
}

/// Run a full health check: ping the pool and return a typed error on failure.
///
/// # Errors
///
/// Returns [`DbError`] if the ping fails.
pub async fn health_check(pool: &PgPool) -> Result<(), DbError> {
    ping(pool).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_config_has_sane_defaults() {
        let config = PoolConfig::default();

        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(config.acquire_timeout_secs, DEFAULT_ACQUIRE_TIMEOUT_SECS);
    }

    #[test]
    fn db_config_debug_redacts_password() {
        let config = DbConfig {
            host: "localhost".to_string(),
            port: 5432,
            database: "catalog".to_string(),
            user: "loader".to_string(),
            password: Some("hunter2".to_string()),
            pool: PoolConfig::default(),
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("[redacted]"));
    }
}
