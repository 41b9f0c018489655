//! Core SqlHaus functionality
//!
//! This module contains the main SqlHaus struct and its implementation,
//! providing centralized coordination of the connection pool, the shared
//! mapper registry and the data access objects built on them.

use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use sql_object::{MapperRegistry, QueryError, QueryProperty, Restriction, SqlAppender};
use std::sync::Arc;
use std::time::Duration;

use crate::dao::Dao;
use crate::errors::SqlHausError;
use crate::executor::MySqlExecutor;
use config::{AppConfig, QueryConfig};

/// Main SqlHaus coordinator that owns the pool and the mapper registry
pub struct SqlHaus {
    pool: MySqlPool,
    registry: Arc<MapperRegistry>,
    query: QueryConfig,
}

impl SqlHaus {
    /// Validate the configuration and open the connection pool
    pub async fn new(config: AppConfig) -> Result<Self, SqlHausError> {
        config.validate()?;
        let database = &config.database;
        let connection_string = database.connection_string();

        let mut pool_options = MySqlPoolOptions::new()
            .max_connections(database.max_connections)
            .min_connections(database.min_connections)
            .acquire_timeout(Duration::from_secs(database.connection_timeout_seconds))
            .idle_timeout(Duration::from_secs(database.idle_timeout_seconds));

        // Set max lifetime if specified
        if database.max_lifetime_seconds > 0 {
            pool_options =
                pool_options.max_lifetime(Duration::from_secs(database.max_lifetime_seconds));
        }

        let pool = pool_options.connect(&connection_string).await?;
        tracing::info!(
            "Connected to {}:{}/{}",
            database.host,
            database.port,
            database.database
        );

        Ok(Self::with_pool(pool, config.query))
    }

    /// Wrap an existing pool
    pub fn with_pool(pool: MySqlPool, query: QueryConfig) -> Self {
        Self {
            pool,
            registry: Arc::new(MapperRegistry::new()),
            query,
        }
    }

    /// Get database pool reference
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    pub fn registry(&self) -> &Arc<MapperRegistry> {
        &self.registry
    }

    pub fn query_config(&self) -> &QueryConfig {
        &self.query
    }

    pub fn executor(&self) -> MySqlExecutor {
        MySqlExecutor::new(self.pool.clone())
    }

    /// Data access bound to `table`, sharing this coordinator's registry
    pub fn dao(&self, table: &str) -> Dao<MySqlExecutor> {
        crate::debug_log!("Creating dao for table {}", table);
        Dao::new(self.executor(), table, Arc::clone(&self.registry))
            .with_query_config(&self.query)
    }

    /// Appender seeded with the configured whitespace mode
    pub fn appender(&self) -> SqlAppender {
        SqlAppender::from_config(&self.query)
    }

    /// Restrictions from request parameters under the configured key prefix
    pub fn parse_params<I, K, V>(&self, params: I) -> Result<Vec<Restriction>, QueryError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        QueryProperty::parse_all(params, &self.query.param_prefix)
    }

    /// Check database connection health
    pub async fn health_check(&self) -> Result<(), SqlHausError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}
