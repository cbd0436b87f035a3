//! Connection pool utilities

use crate::config::RestConfig;
use crate::error::{RestError, RestResult};
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use tokio_postgres::NoTls;

/// Create a connection pool from a [`RestConfig`].
///
/// Uses `NoTls`; put a TLS-terminating proxy in front or build the pool
/// yourself if the database requires TLS.
///
/// # Example
///
/// ```ignore
/// let pool = pgrest::create_pool(&RestConfig::from_env()?)?;
/// let client = pool.get().await?;
/// ```
pub fn create_pool(config: &RestConfig) -> RestResult<Pool> {
    let pg_config: tokio_postgres::Config = config
        .database_url
        .parse()
        .map_err(|e: tokio_postgres::Error| RestError::Connection(e.to_string()))?;

    let mgr = Manager::from_config(pg_config, NoTls, default_manager_config());
    Pool::builder(mgr)
        .max_size(config.pool_max_size)
        .build()
        .map_err(|e| RestError::Pool(e.to_string()))
}

fn default_manager_config() -> ManagerConfig {
    ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    }
}
