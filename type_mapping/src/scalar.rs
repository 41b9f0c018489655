//! Scalar type codes
//!
//! Single-letter codes select how a raw string from loosely-typed input
//! (query parameters, form fields) is converted into a [`SqlValue`].

use crate::errors::ValueError;
use crate::types::SqlValue;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    /// `S`
    String,
    /// `I`, 32-bit
    Integer,
    /// `L`, 64-bit
    Long,
    /// `N`, double precision
    Number,
    /// `D`
    Date,
    /// `B`
    Boolean,
    /// `C`
    Character,
}

impl ScalarType {
    pub const ALL: [ScalarType; 7] = [
        ScalarType::String,
        ScalarType::Integer,
        ScalarType::Long,
        ScalarType::Number,
        ScalarType::Date,
        ScalarType::Boolean,
        ScalarType::Character,
    ];

    /// Look up a type by its code; codes are case-sensitive
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "S" => Some(ScalarType::String),
            "I" => Some(ScalarType::Integer),
            "L" => Some(ScalarType::Long),
            "N" => Some(ScalarType::Number),
            "D" => Some(ScalarType::Date),
            "B" => Some(ScalarType::Boolean),
            "C" => Some(ScalarType::Character),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ScalarType::String => "S",
            ScalarType::Integer => "I",
            ScalarType::Long => "L",
            ScalarType::Number => "N",
            ScalarType::Date => "D",
            ScalarType::Boolean => "B",
            ScalarType::Character => "C",
        }
    }

    fn target_name(&self) -> &'static str {
        match self {
            ScalarType::String => "string",
            ScalarType::Integer => "integer",
            ScalarType::Long => "long",
            ScalarType::Number => "number",
            ScalarType::Date => "date",
            ScalarType::Boolean => "boolean",
            ScalarType::Character => "character",
        }
    }

    /// Convert one raw string into a value of this type
    pub fn parse(&self, raw: &str) -> Result<SqlValue, ValueError> {
        let target = self.target_name();
        let trimmed = raw.trim();
        if trimmed.is_empty() && *self != ScalarType::String {
            return Err(ValueError::Empty { target });
        }

        match self {
            ScalarType::String => Ok(SqlValue::Text(raw.to_string())),
            ScalarType::Integer => trimmed
                .parse::<i32>()
                .map(SqlValue::Int)
                .map_err(|e| ValueError::parse(raw, target, e)),
            ScalarType::Long => trimmed
                .parse::<i64>()
                .map(SqlValue::BigInt)
                .map_err(|e| ValueError::parse(raw, target, e)),
            ScalarType::Number => trimmed
                .parse::<f64>()
                .map(SqlValue::Double)
                .map_err(|e| ValueError::parse(raw, target, e)),
            ScalarType::Boolean => match trimmed.to_ascii_lowercase().as_str() {
                "true" | "yes" | "y" | "on" | "1" => Ok(SqlValue::Bool(true)),
                "false" | "no" | "n" | "off" | "0" => Ok(SqlValue::Bool(false)),
                _ => Err(ValueError::parse(raw, target, "unrecognized boolean")),
            },
            ScalarType::Character => {
                let mut chars = trimmed.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(SqlValue::Char(c)),
                    _ => Err(ValueError::parse(raw, target, "expected a single character")),
                }
            }
            ScalarType::Date => parse_date(trimmed).ok_or_else(|| {
                ValueError::parse(raw, target, "expected yyyy-MM-dd[ HH:mm:ss] or RFC 3339")
            }),
        }
    }
}

fn parse_date(text: &str) -> Option<SqlValue> {
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(SqlValue::Date(date));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(SqlValue::DateTime(dt));
        }
    }
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|dt| SqlValue::DateTime(dt.naive_utc()))
}

impl FromStr for ScalarType {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ScalarType::from_code(s).ok_or_else(|| ValueError::parse(s, "type code", "unknown code"))
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
