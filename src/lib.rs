//! # SqlHaus
//!
//! Dynamic SQL construction and row mapping for MySQL: restriction predicates,
//! statement builders, pagination, a cached reflective-style row mapper and a
//! data access layer running on `sqlx`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sqlhaus::prelude::*;
//!
//! #[derive(Debug, Default, MappedType)]
//! #[mapper(table = "m_user", primary_key = "id")]
//! pub struct User {
//!     pub id: i64,
//!     #[mapper(name = "user_name")]
//!     pub name: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let haus = SqlHaus::new(config).await?;
//!     let users = haus.dao("m_user");
//!
//!     let page = users
//!         .get_page::<User>(1, 20, &[Restriction::like("user_name", "jo")])
//!         .await?;
//!     println!("{} of {} users", page.items().len(), page.total_count());
//!
//!     Ok(())
//! }
//! ```

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub mod core;
pub mod dao;
pub mod errors;
pub mod executor;
pub mod prelude;

// Re-export the main public types for convenience
pub use self::core::SqlHaus;
pub use dao::Dao;
pub use errors::SqlHausError;
pub use executor::{ExecuteResult, MySqlExecutor, SqlExecutor};

// Re-export centralized config
pub use config::{AppConfig, DatabaseConfig, QueryConfig};

// Re-export internal crates used by the derive and public API
pub use cache_system;
pub use sql_object;
pub use type_mapping;

// Re-export external dependencies used in public API
pub use async_trait;
pub use sqlx;
