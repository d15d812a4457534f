//! Database client for the StayReal notifier
//!
//! This module provides a database client that is designed to be database agnostic,
//! using SQLx's `Any` driver as the underlying database library.

use crate::error::DbError;
use sqlx::pool::PoolOptions;
use sqlx::Pool;
use stayreal_common::{BoxFuture, HealthCheck, StayrealError};
use stayreal_config::DatabaseConfig;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, error, info};

/// Default size of the connection pool
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Database client
///
/// Cheap to clone: clones share the same connection pool.
#[derive(Debug, Clone)]
pub struct DbClient {
    /// The database connection pool
    pool: Pool<sqlx::Any>,
}

impl DbClient {
    /// Create a new database client from a database configuration
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    ///
    /// * The database URL is empty or invalid
    /// * The database connection fails
    pub async fn from_config(db_config: &DatabaseConfig) -> Result<Self, DbError> {
        let db_url = &db_config.url;
        if db_url.is_empty() {
            return Err(DbError::ConfigError("Database URL is empty".to_string()));
        }

        let max_connections = db_config
            .max_connections
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);
        let pool = Self::create_pool(db_url, max_connections).await?;

        Ok(Self { pool })
    }

    /// Create a new database client from a database URL
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    ///
    /// * The database URL is invalid
    /// * The database connection fails
    pub async fn from_url(db_url: &str) -> Result<Self, DbError> {
        if db_url.is_empty() {
            return Err(DbError::UrlError("Database URL is empty".to_string()));
        }

        let pool = Self::create_pool(db_url, DEFAULT_MAX_CONNECTIONS).await?;

        Ok(Self { pool })
    }

    /// Create a connection pool
    ///
    /// An in-memory SQLite database lives inside a single connection, so the
    /// pool is pinned to one connection that is never recycled.
    async fn create_pool(db_url: &str, max_connections: u32) -> Result<Pool<sqlx::Any>, DbError> {
        debug!("Creating database pool with URL: {}", db_url);

        sqlx::any::install_default_drivers();

        let in_memory = is_sqlite_memory(db_url);
        let pool_options = if in_memory {
            PoolOptions::<sqlx::Any>::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
        } else {
            PoolOptions::<sqlx::Any>::new()
                .max_connections(max_connections)
                .idle_timeout(Duration::from_secs(600))
        }
        .acquire_timeout(Duration::from_secs(3));

        // AnyConnectOptions cannot set create_if_missing, so the file is created up front
        if let Some(db_path) = sqlite_file_path(db_url) {
            ensure_sqlite_file(db_path)?;
        }

        let pool = pool_options
            .connect_with(sqlx::any::AnyConnectOptions::from_str(db_url)?)
            .await
            .map_err(|e| {
                error!("Failed to create database pool: {}", e);
                DbError::PoolError(e.to_string())
            })?;

        info!("Database pool created successfully");
        Ok(pool)
    }

    /// Get the database connection pool
    pub fn pool(&self) -> &Pool<sqlx::Any> {
        &self.pool
    }

    /// Execute a query that returns no rows
    ///
    /// # Returns
    ///
    /// The number of rows affected
    pub async fn execute(&self, query: &str) -> Result<u64, DbError> {
        sqlx::query(query)
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected())
            .map_err(|e| DbError::QueryError(e.to_string()))
    }

    /// Check if the database is healthy by executing a simple query.
    pub async fn is_healthy(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

impl HealthCheck for DbClient {
    fn check(&self) -> BoxFuture<'_, (), StayrealError> {
        Box::pin(async move {
            if self.is_healthy().await {
                Ok(())
            } else {
                Err(StayrealError::DatabaseError(
                    "Database is not reachable".to_string(),
                ))
            }
        })
    }
}

fn is_sqlite_memory(db_url: &str) -> bool {
    db_url.starts_with("sqlite:") && db_url.contains(":memory:")
}

/// Extracts the file path of a file-backed SQLite URL.
///
/// Handles both `sqlite:example.db` and `sqlite://example.db`, and drops any
/// `?query` suffix.
fn sqlite_file_path(db_url: &str) -> Option<&str> {
    if !db_url.starts_with("sqlite:") || is_sqlite_memory(db_url) {
        return None;
    }
    let db_path = db_url
        .strip_prefix("sqlite://")
        .or_else(|| db_url.strip_prefix("sqlite:"))?;
    let db_path = db_path.split('?').next().unwrap_or(db_path);
    (!db_path.is_empty()).then_some(db_path)
}

fn ensure_sqlite_file(db_path: &str) -> Result<(), DbError> {
    let path = Path::new(db_path);
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            debug!("Creating directory for SQLite database: {:?}", dir);
            std::fs::create_dir_all(dir).map_err(|e| {
                error!("Failed to create directory for SQLite database: {}", e);
                DbError::PoolError(format!("Failed to create directory: {}", e))
            })?;
        }
    }

    if !path.exists() {
        debug!("Creating empty SQLite database file: {}", db_path);
        std::fs::File::create(path).map_err(|e| {
            error!("Failed to create SQLite database file: {}", e);
            DbError::PoolError(format!("Failed to create database file: {}", e))
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_file_path() {
        assert_eq!(sqlite_file_path("sqlite://data/db.sqlite"), Some("data/db.sqlite"));
        assert_eq!(sqlite_file_path("sqlite:db.sqlite?mode=rwc"), Some("db.sqlite"));
        assert_eq!(sqlite_file_path("sqlite::memory:"), None);
        assert_eq!(sqlite_file_path("postgres://localhost/stayreal"), None);
    }

    #[tokio::test]
    async fn test_in_memory_client_is_healthy() {
        let client = DbClient::from_url("sqlite::memory:").await.unwrap();
        assert!(client.is_healthy().await);
        assert!(client.check().await.is_ok());
    }

    #[tokio::test]
    async fn test_empty_url_is_rejected() {
        let config = DatabaseConfig {
            url: String::new(),
            max_connections: None,
        };
        assert!(matches!(
            DbClient::from_config(&config).await,
            Err(DbError::ConfigError(_))
        ));
    }
}
