//! Type mapping definitions
//!
//! This module provides the dynamic value carried between query builders,
//! drivers and row mappers.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A single SQL value: a bound parameter or a raw column value read from a row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i32),
    BigInt(i64),
    Double(f64),
    Char(char),
    Text(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Uuid(Uuid),
    Json(serde_json::Value),
    Bytes(Vec<u8>),
    List(Vec<SqlValue>), // expanded into one placeholder per element
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    /// Short type label used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            SqlValue::Null => "null",
            SqlValue::Bool(_) => "bool",
            SqlValue::Int(_) => "int",
            SqlValue::BigInt(_) => "bigint",
            SqlValue::Double(_) => "double",
            SqlValue::Char(_) => "char",
            SqlValue::Text(_) => "text",
            SqlValue::Date(_) => "date",
            SqlValue::DateTime(_) => "datetime",
            SqlValue::Uuid(_) => "uuid",
            SqlValue::Json(_) => "json",
            SqlValue::Bytes(_) => "bytes",
            SqlValue::List(_) => "list",
        }
    }

    /// Text form, or `None` for anything that is not textual
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SqlValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Integer view of numeric values (doubles are not truncated)
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SqlValue::Int(i) => Some(*i as i64),
            SqlValue::BigInt(i) => Some(*i),
            SqlValue::Bool(b) => Some(*b as i64),
            _ => None,
        }
    }

    /// True for null, empty text and empty lists
    pub fn is_empty(&self) -> bool {
        match self {
            SqlValue::Null => true,
            SqlValue::Text(s) => s.is_empty(),
            SqlValue::List(items) => items.is_empty(),
            SqlValue::Bytes(bytes) => bytes.is_empty(),
            _ => false,
        }
    }

    /// Like `is_empty`, but whitespace-only text also counts
    pub fn is_blank(&self) -> bool {
        match self {
            SqlValue::Text(s) => s.trim().is_empty(),
            other => other.is_empty(),
        }
    }
}

impl Default for SqlValue {
    fn default() -> Self {
        SqlValue::Null
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => write!(f, "null"),
            SqlValue::Bool(b) => write!(f, "{}", b),
            SqlValue::Int(i) => write!(f, "{}", i),
            SqlValue::BigInt(i) => write!(f, "{}", i),
            SqlValue::Double(d) => write!(f, "{}", d),
            SqlValue::Char(c) => write!(f, "{}", c),
            SqlValue::Text(s) => write!(f, "{}", s),
            SqlValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            SqlValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            SqlValue::Uuid(u) => write!(f, "{}", u),
            SqlValue::Json(v) => write!(f, "{}", v),
            SqlValue::Bytes(bytes) => write!(f, "{}", String::from_utf8_lossy(bytes)),
            SqlValue::List(items) => {
                let parts: Vec<String> = items.iter().map(|v| v.to_string()).collect();
                write!(f, "{}", parts.join(","))
            }
        }
    }
}

/// Convert basic Rust types to SqlValue
impl From<String> for SqlValue {
    fn from(val: String) -> Self {
        SqlValue::Text(val)
    }
}

impl From<&str> for SqlValue {
    fn from(val: &str) -> Self {
        SqlValue::Text(val.to_string())
    }
}

impl From<&String> for SqlValue {
    fn from(val: &String) -> Self {
        SqlValue::Text(val.clone())
    }
}

impl From<char> for SqlValue {
    fn from(val: char) -> Self {
        SqlValue::Char(val)
    }
}

impl From<bool> for SqlValue {
    fn from(val: bool) -> Self {
        SqlValue::Bool(val)
    }
}

impl From<i8> for SqlValue {
    fn from(val: i8) -> Self {
        SqlValue::Int(val as i32)
    }
}

impl From<i16> for SqlValue {
    fn from(val: i16) -> Self {
        SqlValue::Int(val as i32)
    }
}

impl From<i32> for SqlValue {
    fn from(val: i32) -> Self {
        SqlValue::Int(val)
    }
}

impl From<i64> for SqlValue {
    fn from(val: i64) -> Self {
        SqlValue::BigInt(val)
    }
}

impl From<u8> for SqlValue {
    fn from(val: u8) -> Self {
        SqlValue::Int(val as i32)
    }
}

impl From<u16> for SqlValue {
    fn from(val: u16) -> Self {
        SqlValue::Int(val as i32)
    }
}

impl From<u32> for SqlValue {
    fn from(val: u32) -> Self {
        SqlValue::BigInt(val as i64)
    }
}

impl From<u64> for SqlValue {
    fn from(val: u64) -> Self {
        // Values above i64::MAX are carried as text to avoid silent wrap-around
        match i64::try_from(val) {
            Ok(v) => SqlValue::BigInt(v),
            Err(_) => SqlValue::Text(val.to_string()),
        }
    }
}

impl From<f32> for SqlValue {
    fn from(val: f32) -> Self {
        SqlValue::Double(val as f64)
    }
}

impl From<f64> for SqlValue {
    fn from(val: f64) -> Self {
        SqlValue::Double(val)
    }
}

impl From<NaiveDate> for SqlValue {
    fn from(val: NaiveDate) -> Self {
        SqlValue::Date(val)
    }
}

impl From<NaiveDateTime> for SqlValue {
    fn from(val: NaiveDateTime) -> Self {
        SqlValue::DateTime(val)
    }
}

impl From<chrono::DateTime<chrono::Utc>> for SqlValue {
    fn from(val: chrono::DateTime<chrono::Utc>) -> Self {
        SqlValue::DateTime(val.naive_utc())
    }
}

impl From<Uuid> for SqlValue {
    fn from(val: Uuid) -> Self {
        SqlValue::Uuid(val)
    }
}

impl From<serde_json::Value> for SqlValue {
    fn from(val: serde_json::Value) -> Self {
        SqlValue::Json(val)
    }
}

impl From<Vec<u8>> for SqlValue {
    fn from(val: Vec<u8>) -> Self {
        SqlValue::Bytes(val)
    }
}

impl From<Vec<SqlValue>> for SqlValue {
    fn from(val: Vec<SqlValue>) -> Self {
        SqlValue::List(val)
    }
}

impl<T> From<Option<T>> for SqlValue
where
    T: Into<SqlValue>,
{
    fn from(val: Option<T>) -> Self {
        match val {
            Some(v) => v.into(),
            None => SqlValue::Null,
        }
    }
}

impl From<&SqlValue> for SqlValue {
    fn from(val: &SqlValue) -> Self {
        val.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_none_becomes_null() {
        let value: SqlValue = None::<i64>.into();
        assert!(value.is_null());

        let value: SqlValue = Some("zhangsan").into();
        assert_eq!(value, SqlValue::Text("zhangsan".to_string()));
    }

    #[test]
    fn test_blank_and_empty() {
        assert!(SqlValue::Null.is_empty());
        assert!(SqlValue::from("").is_empty());
        assert!(!SqlValue::from("  ").is_empty());
        assert!(SqlValue::from("  ").is_blank());
        assert!(!SqlValue::from(0).is_blank());
    }

    #[test]
    fn test_display_for_like_wrapping() {
        assert_eq!(format!("%{}%", SqlValue::from("john")), "%john%");
        assert_eq!(format!("{}", SqlValue::from(42i64)), "42");
        let date = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(SqlValue::from(date).to_string(), "2024-01-31");
    }

    #[test]
    fn test_huge_unsigned_is_not_wrapped() {
        assert_eq!(SqlValue::from(u64::MAX), SqlValue::Text(u64::MAX.to_string()));
        assert_eq!(SqlValue::from(7u64), SqlValue::BigInt(7));
    }
}
