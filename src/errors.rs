//! Error types for the SqlHaus crate
//!
//! This module contains all error types that can be returned by SqlHaus operations.

use config::ConfigError;
use sql_object::{MappingError, QueryError};
use thiserror::Error;
use type_mapping::ValueError;

#[derive(Error, Debug)]
pub enum SqlHausError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    #[error("Mapping error: {0}")]
    Mapping(#[from] MappingError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Value error: {0}")]
    Value(#[from] ValueError),

    #[error("Unexpected result: {0}")]
    UnexpectedResult(String),
}
