//! Value coercion
//!
//! This module converts raw [`SqlValue`]s into concrete Rust field types.
//! Numeric conversions are range-checked, text is parsed, and dates widen
//! or narrow between `Date` and `DateTime`.

use crate::errors::ValueError;
use crate::types::SqlValue;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use uuid::Uuid;

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"];

/// Conversion from a raw column value into a typed field
pub trait FromSqlValue: Sized {
    /// Whether a null value is a legal input (true only for `Option<T>`)
    const ACCEPTS_NULL: bool = false;

    /// Name used in error messages
    fn target_name() -> &'static str;

    fn from_sql_value(value: &SqlValue) -> Result<Self, ValueError>;
}

fn incompatible<T: FromSqlValue>(value: &SqlValue) -> ValueError {
    match value {
        SqlValue::Null => ValueError::Empty {
            target: T::target_name(),
        },
        other => ValueError::Incompatible {
            expected: T::target_name(),
            found: other.type_name(),
        },
    }
}

fn parse_text<T>(text: &str, target: &'static str) -> Result<T, ValueError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    text.trim()
        .parse::<T>()
        .map_err(|e| ValueError::parse(text, target, e.to_string()))
}

fn to_i64<T: FromSqlValue>(value: &SqlValue) -> Result<i64, ValueError> {
    match value {
        SqlValue::Int(i) => Ok(*i as i64),
        SqlValue::BigInt(i) => Ok(*i),
        SqlValue::Bool(b) => Ok(*b as i64),
        SqlValue::Double(d) => {
            if d.fract() == 0.0 && *d >= i64::MIN as f64 && *d <= i64::MAX as f64 {
                Ok(*d as i64)
            } else {
                Err(ValueError::parse(d.to_string(), T::target_name(), "not an integral value"))
            }
        }
        SqlValue::Text(s) => parse_text::<i64>(s, T::target_name()),
        other => Err(incompatible::<T>(other)),
    }
}

macro_rules! impl_integer {
    ($($ty:ty => $name:literal),* $(,)?) => {
        $(
            impl FromSqlValue for $ty {
                fn target_name() -> &'static str {
                    $name
                }

                fn from_sql_value(value: &SqlValue) -> Result<Self, ValueError> {
                    let wide = to_i64::<Self>(value)?;
                    <$ty>::try_from(wide).map_err(|_| {
                        ValueError::parse(wide.to_string(), $name, "out of range")
                    })
                }
            }
        )*
    };
}

impl_integer!(
    i8 => "i8",
    i16 => "i16",
    i32 => "i32",
    i64 => "i64",
    u8 => "u8",
    u16 => "u16",
    u32 => "u32",
    u64 => "u64",
    usize => "usize",
);

impl FromSqlValue for f64 {
    fn target_name() -> &'static str {
        "f64"
    }

    fn from_sql_value(value: &SqlValue) -> Result<Self, ValueError> {
        match value {
            SqlValue::Double(d) => Ok(*d),
            SqlValue::Int(i) => Ok(*i as f64),
            SqlValue::BigInt(i) => Ok(*i as f64),
            SqlValue::Text(s) => parse_text::<f64>(s, "f64"),
            other => Err(incompatible::<Self>(other)),
        }
    }
}

impl FromSqlValue for f32 {
    fn target_name() -> &'static str {
        "f32"
    }

    fn from_sql_value(value: &SqlValue) -> Result<Self, ValueError> {
        f64::from_sql_value(value)
            .map(|d| d as f32)
            .map_err(|e| match e {
                ValueError::Empty { .. } => ValueError::Empty { target: "f32" },
                other => other,
            })
    }
}

impl FromSqlValue for bool {
    fn target_name() -> &'static str {
        "bool"
    }

    fn from_sql_value(value: &SqlValue) -> Result<Self, ValueError> {
        match value {
            SqlValue::Bool(b) => Ok(*b),
            SqlValue::Int(i) => Ok(*i != 0),
            SqlValue::BigInt(i) => Ok(*i != 0),
            SqlValue::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(true),
                "false" | "0" => Ok(false),
                _ => Err(ValueError::parse(s.as_str(), "bool", "expected true/false/1/0")),
            },
            other => Err(incompatible::<Self>(other)),
        }
    }
}

impl FromSqlValue for String {
    fn target_name() -> &'static str {
        "String"
    }

    fn from_sql_value(value: &SqlValue) -> Result<Self, ValueError> {
        match value {
            SqlValue::Null | SqlValue::List(_) => Err(incompatible::<Self>(value)),
            other => Ok(other.to_string()),
        }
    }
}

impl FromSqlValue for char {
    fn target_name() -> &'static str {
        "char"
    }

    fn from_sql_value(value: &SqlValue) -> Result<Self, ValueError> {
        match value {
            SqlValue::Char(c) => Ok(*c),
            SqlValue::Text(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(c),
                    _ => Err(ValueError::parse(s.as_str(), "char", "expected a single character")),
                }
            }
            other => Err(incompatible::<Self>(other)),
        }
    }
}

fn parse_datetime(text: &str) -> Result<NaiveDateTime, ValueError> {
    let trimmed = text.trim();
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(dt);
        }
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(|d| d.and_time(NaiveTime::MIN))
        .map_err(|e| ValueError::parse(text, "NaiveDateTime", e.to_string()))
}

impl FromSqlValue for NaiveDateTime {
    fn target_name() -> &'static str {
        "NaiveDateTime"
    }

    fn from_sql_value(value: &SqlValue) -> Result<Self, ValueError> {
        match value {
            SqlValue::DateTime(dt) => Ok(*dt),
            SqlValue::Date(d) => Ok(d.and_time(NaiveTime::MIN)),
            SqlValue::Text(s) => parse_datetime(s),
            other => Err(incompatible::<Self>(other)),
        }
    }
}

impl FromSqlValue for NaiveDate {
    fn target_name() -> &'static str {
        "NaiveDate"
    }

    fn from_sql_value(value: &SqlValue) -> Result<Self, ValueError> {
        match value {
            SqlValue::Date(d) => Ok(*d),
            SqlValue::DateTime(dt) => Ok(dt.date()),
            SqlValue::Text(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                .or_else(|_| parse_datetime(s).map(|dt| dt.date()))
                .map_err(|_| ValueError::parse(s.as_str(), "NaiveDate", "expected yyyy-MM-dd")),
            other => Err(incompatible::<Self>(other)),
        }
    }
}

impl FromSqlValue for DateTime<Utc> {
    fn target_name() -> &'static str {
        "DateTime<Utc>"
    }

    fn from_sql_value(value: &SqlValue) -> Result<Self, ValueError> {
        NaiveDateTime::from_sql_value(value)
            .map(|dt| dt.and_utc())
            .map_err(|e| match e {
                ValueError::Empty { .. } => ValueError::Empty {
                    target: "DateTime<Utc>",
                },
                other => other,
            })
    }
}

impl FromSqlValue for Uuid {
    fn target_name() -> &'static str {
        "Uuid"
    }

    fn from_sql_value(value: &SqlValue) -> Result<Self, ValueError> {
        match value {
            SqlValue::Uuid(u) => Ok(*u),
            SqlValue::Text(s) => parse_text::<Uuid>(s, "Uuid"),
            SqlValue::Bytes(b) => {
                Uuid::from_slice(b).map_err(|e| ValueError::parse("<bytes>", "Uuid", e.to_string()))
            }
            other => Err(incompatible::<Self>(other)),
        }
    }
}

impl FromSqlValue for serde_json::Value {
    fn target_name() -> &'static str {
        "serde_json::Value"
    }

    fn from_sql_value(value: &SqlValue) -> Result<Self, ValueError> {
        match value {
            SqlValue::Json(v) => Ok(v.clone()),
            SqlValue::Text(s) => serde_json::from_str(s)
                .map_err(|e| ValueError::parse(s.as_str(), "serde_json::Value", e.to_string())),
            other => Err(incompatible::<Self>(other)),
        }
    }
}

impl FromSqlValue for Vec<u8> {
    fn target_name() -> &'static str {
        "Vec<u8>"
    }

    fn from_sql_value(value: &SqlValue) -> Result<Self, ValueError> {
        match value {
            SqlValue::Bytes(b) => Ok(b.clone()),
            SqlValue::Text(s) => Ok(s.as_bytes().to_vec()),
            other => Err(incompatible::<Self>(other)),
        }
    }
}

impl FromSqlValue for SqlValue {
    const ACCEPTS_NULL: bool = true;

    fn target_name() -> &'static str {
        "SqlValue"
    }

    fn from_sql_value(value: &SqlValue) -> Result<Self, ValueError> {
        Ok(value.clone())
    }
}

impl<T: FromSqlValue> FromSqlValue for Option<T> {
    const ACCEPTS_NULL: bool = true;

    fn target_name() -> &'static str {
        T::target_name()
    }

    fn from_sql_value(value: &SqlValue) -> Result<Self, ValueError> {
        if value.is_null() {
            Ok(None)
        } else {
            T::from_sql_value(value).map(Some)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_range_checks() {
        assert_eq!(i32::from_sql_value(&SqlValue::BigInt(42)).unwrap(), 42);
        assert!(i8::from_sql_value(&SqlValue::Int(300)).is_err());
        assert!(u32::from_sql_value(&SqlValue::Int(-1)).is_err());
        assert_eq!(i64::from_sql_value(&SqlValue::Text(" 17 ".into())).unwrap(), 17);
        assert_eq!(i64::from_sql_value(&SqlValue::Double(3.0)).unwrap(), 3);
        assert!(i64::from_sql_value(&SqlValue::Double(3.5)).is_err());
    }

    #[test]
    fn test_null_requires_option() {
        assert_eq!(
            i64::from_sql_value(&SqlValue::Null),
            Err(ValueError::Empty { target: "i64" })
        );
        assert_eq!(Option::<i64>::from_sql_value(&SqlValue::Null).unwrap(), None);
        assert!(<Option<i64> as FromSqlValue>::ACCEPTS_NULL);
        assert!(!<i64 as FromSqlValue>::ACCEPTS_NULL);
    }

    #[test]
    fn test_incompatible_reports_types() {
        let err = Uuid::from_sql_value(&SqlValue::Bool(true)).unwrap_err();
        assert_eq!(
            err,
            ValueError::Incompatible {
                expected: "Uuid",
                found: "bool"
            }
        );
    }

    #[test]
    fn test_date_widening_and_narrowing() {
        let date = NaiveDate::from_ymd_opt(2023, 5, 6).unwrap();
        let dt = NaiveDateTime::from_sql_value(&SqlValue::Date(date)).unwrap();
        assert_eq!(dt.date(), date);
        assert_eq!(dt.time(), NaiveTime::MIN);

        let back = NaiveDate::from_sql_value(&SqlValue::DateTime(dt)).unwrap();
        assert_eq!(back, date);

        let parsed = NaiveDateTime::from_sql_value(&SqlValue::Text("2023-05-06 10:11:12".into())).unwrap();
        assert_eq!(parsed.date(), date);
        assert_eq!(NaiveDate::from_sql_value(&SqlValue::Text("2023-05-06".into())).unwrap(), date);
    }

    #[test]
    fn test_bool_and_text() {
        assert!(bool::from_sql_value(&SqlValue::Int(1)).unwrap());
        assert!(!bool::from_sql_value(&SqlValue::Text("false".into())).unwrap());
        assert!(bool::from_sql_value(&SqlValue::Text("maybe".into())).is_err());
        assert_eq!(String::from_sql_value(&SqlValue::BigInt(9)).unwrap(), "9");
        assert_eq!(char::from_sql_value(&SqlValue::Text("Y".into())).unwrap(), 'Y');
    }
}
