//! Error types for value conversion
//!
//! This module defines the errors raised when a raw value cannot be
//! coerced into the requested Rust or SQL type.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValueError {
    #[error("Incompatible value: expected {expected}, found {found}")]
    Incompatible {
        expected: &'static str,
        found: &'static str,
    },

    #[error("Cannot parse '{value}' as {target}: {reason}")]
    Parse {
        value: String,
        target: &'static str,
        reason: String,
    },

    #[error("Empty value cannot be converted to {target}")]
    Empty { target: &'static str },
}

impl ValueError {
    pub fn parse(value: impl Into<String>, target: &'static str, reason: impl ToString) -> Self {
        ValueError::Parse {
            value: value.into(),
            target,
            reason: reason.to_string(),
        }
    }
}
