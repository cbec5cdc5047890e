//! Connection pool utilities
//!
//! One pool is created at startup and handed to [`crate::MySqlExecutor`];
//! every statement borrows a connection from it. Close it explicitly on
//! shutdown with [`crate::MySqlExecutor::close`].

use crate::config::DbConfig;
use crate::error::{DbError, DbResult};
use sqlx::MySqlPool;
use sqlx::mysql::MySqlPoolOptions;

/// Create a connection pool and open the first connection.
///
/// # Example
///
/// ```ignore
/// let config = sqlobject::DbConfig::from_dotenv()?;
/// let pool = sqlobject::create_pool(&config).await?;
/// ```
pub async fn create_pool(config: &DbConfig) -> DbResult<MySqlPool> {
    pool_options(config)
        .connect_with(config.connect_options()?)
        .await
        .map_err(|e| DbError::Connection(e.to_string()))
}

/// Create a connection pool without connecting; connections open on first use.
pub fn create_pool_lazy(config: &DbConfig) -> DbResult<MySqlPool> {
    Ok(pool_options(config).connect_lazy_with(config.connect_options()?))
}

fn pool_options(config: &DbConfig) -> MySqlPoolOptions {
    MySqlPoolOptions::new().max_connections(config.max_connections.max(1))
}
