//! Error types for SQL construction and row mapping
//!
//! This module defines the errors raised while building statements from
//! restrictions and encoded keys, and while mapping rows onto typed records.

use thiserror::Error;
use type_mapping::ValueError;

/// Errors raised while building SQL text or parameter lists
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error("Unknown type code: {0}")]
    UnknownType(String),

    #[error("Unknown operator: {0}")]
    UnknownOperator(String),

    #[error("Malformed query key: {0}")]
    MalformedKey(String),

    #[error("Conversion error for '{key}': {source}")]
    Conversion {
        key: String,
        #[source]
        source: ValueError,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Key count[{keys}] and value count[{values}] is inequality")]
    ArgumentMismatch { keys: usize, values: usize },

    #[error("Missing named parameter: {0}")]
    MissingParameter(String),
}

impl QueryError {
    pub fn invalid(message: impl Into<String>) -> Self {
        QueryError::InvalidArgument(message.into())
    }
}

/// Errors raised while materializing a row into a typed record
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MappingError {
    #[error("Cannot instantiate {type_name}: {reason}")]
    Instantiation {
        type_name: &'static str,
        reason: String,
    },

    #[error("No writable field '{field}' on {type_name}")]
    NoAccessor {
        type_name: &'static str,
        field: String,
    },

    #[error("Cannot assign column '{column}' to {type_name}.{field}: {source}")]
    Assignment {
        type_name: &'static str,
        field: String,
        column: String,
        #[source]
        source: ValueError,
    },

    #[error("Converter {converter} failed for {type_name}.{field}: {source}")]
    Converter {
        type_name: &'static str,
        field: String,
        converter: &'static str,
        #[source]
        source: ValueError,
    },
}
