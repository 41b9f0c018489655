//! # Configuration Management for SqlHaus
//!
//! This crate provides centralized configuration structures for all SqlHaus components:
//! the MySQL connection pool and the query-building defaults.
//!
//! ## Quick Start
//!
//! ### Programmatic Configuration
//! ```rust
//! use config::{DatabaseConfig, QueryConfig};
//!
//! let db_config = DatabaseConfig::new(
//!     "localhost".to_string(), 3306, "myapp".to_string(),
//!     "root".to_string(), "password".to_string(),
//!     1, 10, 30, 600, 3600,
//! );
//!
//! let query_config = QueryConfig::default().with_show_sql(true);
//! assert_eq!(query_config.param_prefix, "Q");
//! ```
//!
//! ### TOML File Configuration
//! ```toml
//! [database]
//! host = "localhost"
//! port = 3306
//! database = "myapp"
//! username = "root"
//! password = "password"
//! min_connections = 1
//! max_connections = 10
//! connection_timeout_seconds = 30
//! idle_timeout_seconds = 600
//! max_lifetime_seconds = 3600
//!
//! [query]
//! param_prefix = "Q"
//! show_sql = true
//! append_whitespace = false
//! default_page_size = 20
//! ```
//!
//! The `[query]` table and each of its keys are optional.
//!
//! Load configuration:
//! ```rust,no_run
//! use config::AppConfig;
//!
//! // Load from SQLHAUS_CONFIG or ./sqlhaus.toml
//! let config = AppConfig::load()?;
//!
//! // Or load from custom path
//! let config = AppConfig::from_file("config/production.toml")?;
//! # Ok::<(), config::ConfigError>(())
//! ```

use serde::{Deserialize, Serialize};
use std::{env, path::Path};
use thiserror::Error;

const DEFAULT_CONFIG_PATH: &str = "./sqlhaus.toml";
const CONFIG_PATH_VAR: &str = "SQLHAUS_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Environment variable error: {0}")]
    Env(#[from] env::VarError),
    #[error("Dotenvy error: {0}")]
    Dotenvy(#[from] dotenvy::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub query: QueryConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
    pub min_connections: u32,
    pub max_connections: u32,
    pub connection_timeout_seconds: u64,
    pub idle_timeout_seconds: u64,
    pub max_lifetime_seconds: u64,
}

/// Query building defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Prefix marking encoded filter keys in request parameters
    pub param_prefix: String,
    /// Log generated SQL at debug level
    pub show_sql: bool,
    /// Append a space after every phrase pushed into an appender
    pub append_whitespace: bool,
    pub default_page_size: i64,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            param_prefix: "Q".to_string(),
            show_sql: false,
            append_whitespace: false,
            default_page_size: 20,
        }
    }
}

impl QueryConfig {
    pub fn with_show_sql(mut self, show_sql: bool) -> Self {
        self.show_sql = show_sql;
        self
    }

    pub fn with_param_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.param_prefix = prefix.into();
        self
    }

    pub fn with_append_whitespace(mut self, append_whitespace: bool) -> Self {
        self.append_whitespace = append_whitespace;
        self
    }

    pub fn with_default_page_size(mut self, page_size: i64) -> Self {
        self.default_page_size = page_size;
        self
    }
}

impl AppConfig {
    pub fn new(database: DatabaseConfig, query: QueryConfig) -> Self {
        Self { database, query }
    }

    /// Load configuration from TOML file specified in .env or defaults
    pub fn load() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(_) => {}
            Err(e) if e.not_found() => {}
            Err(e) => return Err(e.into()),
        }

        // Path from SQLHAUS_CONFIG first, then DEFAULT_CONFIG_PATH
        if let Ok(config_path) = env::var(CONFIG_PATH_VAR) {
            Self::from_file(&config_path)
        } else if Path::new(DEFAULT_CONFIG_PATH).exists() {
            Self::from_file(DEFAULT_CONFIG_PATH)
        } else {
            Err(ConfigError::Invalid(format!(
                "Config path must be specified in .env file as {} or in {} file",
                CONFIG_PATH_VAR, DEFAULT_CONFIG_PATH
            )))
        }
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.database.validate()?;
        self.query.validate()
    }
}

impl DatabaseConfig {
    /// Create a new database configuration
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        host: String,
        port: u16,
        database: String,
        username: String,
        password: String,
        min_connections: u32,
        max_connections: u32,
        connection_timeout_seconds: u64,
        idle_timeout_seconds: u64,
        max_lifetime_seconds: u64,
    ) -> Self {
        Self {
            host,
            port,
            database,
            username,
            password,
            min_connections,
            max_connections,
            connection_timeout_seconds,
            idle_timeout_seconds,
            max_lifetime_seconds,
        }
    }

    /// Build connection string
    pub fn connection_string(&self) -> String {
        format!(
            "mysql://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.database
        )
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            (self.host.is_empty(), "host cannot be empty"),
            (self.port == 0, "port cannot be zero"),
            (self.database.is_empty(), "name cannot be empty"),
            (self.username.is_empty(), "username cannot be empty"),
            (self.min_connections == 0, "min_connections must be at least 1"),
            (
                self.min_connections > self.max_connections,
                "min_connections cannot exceed max_connections",
            ),
            (
                self.connection_timeout_seconds == 0,
                "connection_timeout_seconds must be at least 1",
            ),
        ];
        match checks.iter().find(|(failed, _)| *failed) {
            Some((_, message)) => Err(ConfigError::Invalid(format!("Database {}", message))),
            None => Ok(()),
        }
    }
}

impl QueryConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.param_prefix.is_empty() {
            return Err(ConfigError::Invalid(
                "Query param_prefix cannot be empty".to_string(),
            ));
        }
        if self.param_prefix.contains('-') {
            return Err(ConfigError::Invalid(
                "Query param_prefix cannot contain '-'".to_string(),
            ));
        }
        if self.default_page_size <= 0 {
            return Err(ConfigError::Invalid(
                "Query default_page_size must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
