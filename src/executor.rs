//! Statement execution
//!
//! This module defines the `SqlExecutor` seam the data access layer runs
//! statements through, and its MySQL implementation over a `sqlx` pool.

use async_trait::async_trait;
use serde::Serialize;
use sqlx::mysql::{MySqlArguments, MySqlPool, MySqlRow};
use sqlx::query::Query;
use sqlx::{Column, MySql, Row, TypeInfo, ValueRef};
use sql_object::QueryError;
use type_mapping::{FromSqlValue, SqlRow, SqlValue};

use crate::errors::SqlHausError;

/// Outcome of an insert, update or delete
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExecuteResult {
    pub rows_affected: u64,
    /// Auto-increment key generated by the statement, if any
    pub last_insert_id: Option<u64>,
}

/// Runs positional statements and returns dynamic rows
#[async_trait]
pub trait SqlExecutor: Send + Sync {
    async fn query(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<SqlRow>, SqlHausError>;

    async fn execute(&self, sql: &str, params: &[SqlValue])
        -> Result<ExecuteResult, SqlHausError>;

    /// First column of the first row; `None` when no row comes back
    async fn fetch_scalar(
        &self,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<Option<SqlValue>, SqlHausError> {
        let rows = self.query(sql, params).await?;
        Ok(rows.first().and_then(|row| row.get_index(0)).cloned())
    }

    /// Integer scalar such as a count; a missing row or null reads as 0
    async fn fetch_i64(&self, sql: &str, params: &[SqlValue]) -> Result<i64, SqlHausError> {
        match self.fetch_scalar(sql, params).await? {
            Some(value) if !value.is_null() => Ok(i64::from_sql_value(&value)?),
            _ => Ok(0),
        }
    }
}

/// `SqlExecutor` over a MySQL pool
#[derive(Debug, Clone)]
pub struct MySqlExecutor {
    pool: MySqlPool,
}

impl MySqlExecutor {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    fn bind_all<'q>(
        sql: &'q str,
        params: &[SqlValue],
    ) -> Result<Query<'q, MySql, MySqlArguments>, SqlHausError> {
        let mut query = sqlx::query(sql);
        for value in params {
            query = bind_value(query, value)?;
        }
        Ok(query)
    }
}

fn bind_value<'q>(
    query: Query<'q, MySql, MySqlArguments>,
    value: &SqlValue,
) -> Result<Query<'q, MySql, MySqlArguments>, SqlHausError> {
    let query = match value {
        SqlValue::Null => query.bind(None::<String>),
        SqlValue::Bool(b) => query.bind(*b),
        SqlValue::Int(n) => query.bind(*n),
        SqlValue::BigInt(n) => query.bind(*n),
        SqlValue::Double(n) => query.bind(*n),
        SqlValue::Char(c) => query.bind(c.to_string()),
        SqlValue::Text(s) => query.bind(s.clone()),
        SqlValue::Date(d) => query.bind(*d),
        SqlValue::DateTime(dt) => query.bind(*dt),
        // Stored in its textual form, as CHAR(36)
        SqlValue::Uuid(u) => query.bind(u.to_string()),
        SqlValue::Json(v) => query.bind(sqlx::types::Json(v.clone())),
        SqlValue::Bytes(b) => query.bind(b.clone()),
        SqlValue::List(_) => {
            return Err(QueryError::invalid(
                "a list cannot be bound to a single placeholder; expand it first",
            )
            .into());
        }
    };
    Ok(query)
}

fn decode_column(row: &MySqlRow, idx: usize) -> Result<SqlValue, sqlx::Error> {
    if row.try_get_raw(idx)?.is_null() {
        return Ok(SqlValue::Null);
    }

    let type_name = row.column(idx).type_info().name().to_ascii_uppercase();
    let value = match type_name.as_str() {
        "BOOLEAN" => SqlValue::Bool(row.try_get::<bool, _>(idx)?),
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" => SqlValue::Int(row.try_get::<i32, _>(idx)?),
        "BIGINT" => SqlValue::BigInt(row.try_get::<i64, _>(idx)?),
        t if t.ends_with("UNSIGNED") || t == "YEAR" || t == "BIT" => {
            SqlValue::from(row.try_get_unchecked::<u64, _>(idx)?)
        }
        "FLOAT" => SqlValue::Double(f64::from(row.try_get::<f32, _>(idx)?)),
        "DOUBLE" => SqlValue::Double(row.try_get::<f64, _>(idx)?),
        // Kept as text to preserve precision
        "DECIMAL" => SqlValue::Text(row.try_get_unchecked::<String, _>(idx)?),
        "DATE" => SqlValue::Date(row.try_get::<chrono::NaiveDate, _>(idx)?),
        "DATETIME" | "TIMESTAMP" => {
            SqlValue::DateTime(row.try_get::<chrono::NaiveDateTime, _>(idx)?)
        }
        "TIME" => SqlValue::Text(row.try_get::<chrono::NaiveTime, _>(idx)?.to_string()),
        "JSON" => SqlValue::Json(row.try_get::<sqlx::types::Json<serde_json::Value>, _>(idx)?.0),
        "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" => {
            SqlValue::Bytes(row.try_get::<Vec<u8>, _>(idx)?)
        }
        _ => SqlValue::Text(row.try_get_unchecked::<String, _>(idx)?),
    };
    Ok(value)
}

fn to_sql_row(row: &MySqlRow) -> Result<SqlRow, sqlx::Error> {
    let mut out = SqlRow::new();
    for (idx, column) in row.columns().iter().enumerate() {
        out.push(column.name(), decode_column(row, idx)?);
    }
    Ok(out)
}

#[async_trait]
impl SqlExecutor for MySqlExecutor {
    async fn query(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<SqlRow>, SqlHausError> {
        crate::trace_log!("Query with {} params: {}", params.len(), sql);
        let rows = Self::bind_all(sql, params)?.fetch_all(&self.pool).await?;
        let rows = rows
            .iter()
            .map(to_sql_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    async fn execute(
        &self,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<ExecuteResult, SqlHausError> {
        crate::trace_log!("Execute with {} params: {}", params.len(), sql);
        let result = Self::bind_all(sql, params)?.execute(&self.pool).await?;
        let last_insert_id = match result.last_insert_id() {
            0 => None,
            id => Some(id),
        };
        Ok(ExecuteResult {
            rows_affected: result.rows_affected(),
            last_insert_id,
        })
    }
}
