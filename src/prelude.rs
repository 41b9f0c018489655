//! Convenience re-exports for common SqlHaus usage
//!
//! This prelude module re-exports the most commonly used items from the SqlHaus ecosystem,
//! making it easier to import everything you need with a single use statement.
//!
//! # Example
//!
//! ```rust
//! use sqlhaus::prelude::*;
//!
//! let (sql, values) = SqlGenerator::build(&[Restriction::eq("id", 1i64)]).unwrap();
//! assert_eq!(sql, "id = ? ");
//! assert_eq!(values, vec![SqlValue::BigInt(1)]);
//! ```

// Core SqlHaus components
pub use crate::core::SqlHaus;
pub use crate::dao::Dao;
pub use crate::errors::SqlHausError;
pub use crate::executor::{ExecuteResult, MySqlExecutor, SqlExecutor};

// Re-export centralized config
pub use config::{AppConfig, DatabaseConfig, QueryConfig};

// Re-export commonly used sql-object types for convenience
pub use sql_object::prelude::*;

// Re-export sql_object for derive-generated code
pub use sql_object;

// Re-export the derive alongside the trait
pub use sql_object::MappedType;

// Re-export cache statistics
pub use cache_system::prelude::CacheStats;

// Common external dependencies
pub use async_trait;
pub use sqlx;
pub use tokio;
pub use uuid::Uuid;
