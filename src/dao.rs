//! Data access helpers
//!
//! This module provides `Dao`, a table-bound set of query, paging and write
//! helpers that compose the sql-object builders with a `SqlExecutor` and the
//! shared mapper registry.

use std::collections::HashMap;
use std::sync::Arc;

use config::QueryConfig;
use sql_object::helper::Columns;
use sql_object::query_property::DEFAULT_PREFIX;
use sql_object::{
    MappedType, MapperRegistry, NamedSql, PageResult, QueryError, QueryProperty, Restriction,
    SqlGenerator, SqlHelper,
};
use type_mapping::{FromSqlValue, SqlRow, SqlValue};

use crate::errors::SqlHausError;
use crate::executor::{ExecuteResult, SqlExecutor};

/// Table-bound data access over an executor
///
/// Record-typed operations use `MappedType::table_name()` when the type declares
/// one and fall back to the table this `Dao` was created for.
#[derive(Debug, Clone)]
pub struct Dao<E> {
    executor: E,
    table: String,
    registry: Arc<MapperRegistry>,
    show_sql: bool,
    param_prefix: String,
    default_page_size: i64,
}

impl<E: SqlExecutor> Dao<E> {
    pub fn new(executor: E, table: impl Into<String>, registry: Arc<MapperRegistry>) -> Self {
        Self {
            executor,
            table: table.into(),
            registry,
            show_sql: false,
            param_prefix: DEFAULT_PREFIX.to_string(),
            default_page_size: 20,
        }
    }

    /// Log every generated statement at debug level
    pub fn with_show_sql(mut self, show_sql: bool) -> Self {
        self.show_sql = show_sql;
        self
    }

    /// Take `show_sql`, the request key prefix and the default page size from `config`
    pub fn with_query_config(mut self, config: &QueryConfig) -> Self {
        self.show_sql = config.show_sql;
        self.param_prefix = config.param_prefix.clone();
        self.default_page_size = config.default_page_size;
        self
    }

    pub fn param_prefix(&self) -> &str {
        &self.param_prefix
    }

    pub fn default_page_size(&self) -> i64 {
        self.default_page_size
    }

    pub fn table_name(&self) -> &str {
        &self.table
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn registry(&self) -> &Arc<MapperRegistry> {
        &self.registry
    }

    fn table_for<T: MappedType>(&self) -> &str {
        T::table_name().unwrap_or(self.table.as_str())
    }

    fn log_sql(&self, kind: &str, sql: &str) {
        if self.show_sql {
            tracing::debug!("{} SQL: {}", kind, sql);
        }
    }

    async fn query_mapped<T: MappedType>(
        &self,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<Vec<T>, SqlHausError> {
        let rows = self.executor.query(sql, params).await?;
        Ok(self.registry.mapper::<T>().map_rows(&rows)?)
    }

    fn select_sql(
        table: &str,
        restrictions: &[Restriction],
    ) -> Result<(String, Vec<SqlValue>), QueryError> {
        let sql = SqlHelper::select(table)
            .columns("*")
            .where_restrictions(restrictions)?
            .to_sql_string();
        Ok((sql, SqlGenerator::where_values(restrictions)))
    }

    // ========================================
    // Single values and records
    // ========================================

    /// First column of the first row, coerced to `V`; no row or a null reads as `None`
    pub async fn get_scalar<V: FromSqlValue>(
        &self,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<Option<V>, SqlHausError> {
        self.log_sql("Select", sql);
        match self.executor.fetch_scalar(sql, params).await? {
            Some(value) if !value.is_null() => Ok(Some(V::from_sql_value(&value)?)),
            _ => Ok(None),
        }
    }

    /// First row mapped to `T`, or `None` when the query returns nothing
    pub async fn get_object<T: MappedType>(
        &self,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<Option<T>, SqlHausError> {
        self.log_sql("Select", sql);
        let rows = self.executor.query(sql, params).await?;
        match rows.first() {
            Some(row) => Ok(Some(self.registry.mapper::<T>().map_row(row)?)),
            None => Ok(None),
        }
    }

    pub async fn get_object_by<T: MappedType>(
        &self,
        restrictions: &[Restriction],
    ) -> Result<Option<T>, SqlHausError> {
        let (sql, values) = Self::select_sql(self.table_for::<T>(), restrictions)?;
        self.get_object(&sql, &values).await
    }

    // ========================================
    // Counts and lists
    // ========================================

    pub async fn get_count(&self, restrictions: &[Restriction]) -> Result<i64, SqlHausError> {
        let sql = SqlHelper::select(&self.table)
            .count("*")
            .where_restrictions(restrictions)?
            .to_count_string();
        self.get_count_sql(&sql, &SqlGenerator::where_values(restrictions))
            .await
    }

    pub async fn get_count_sql(&self, sql: &str, params: &[SqlValue]) -> Result<i64, SqlHausError> {
        self.log_sql("Select", sql);
        self.executor.fetch_i64(sql, params).await
    }

    pub async fn get_list<T: MappedType>(
        &self,
        restrictions: &[Restriction],
    ) -> Result<Vec<T>, SqlHausError> {
        let (sql, values) = Self::select_sql(self.table_for::<T>(), restrictions)?;
        self.get_list_sql(&sql, &values).await
    }

    pub async fn get_list_sql<T: MappedType>(
        &self,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<Vec<T>, SqlHausError> {
        self.log_sql("Select", sql);
        self.query_mapped(sql, params).await
    }

    /// One page of records without the total count
    pub async fn get_list_page<T: MappedType>(
        &self,
        page_no: i64,
        page_size: i64,
        restrictions: &[Restriction],
    ) -> Result<Vec<T>, SqlHausError> {
        let (mut sql, values) = Self::select_sql(self.table_for::<T>(), restrictions)?;
        sql.push_str(&SqlHelper::limit_sql(page_no, page_size)?);
        self.get_list_sql(&sql, &values).await
    }

    /// Unmapped rows of the bound table
    pub async fn get_rows(&self, restrictions: &[Restriction]) -> Result<Vec<SqlRow>, SqlHausError> {
        let (sql, values) = Self::select_sql(&self.table, restrictions)?;
        self.log_sql("Select", &sql);
        self.executor.query(&sql, &values).await
    }

    // ========================================
    // Pages
    // ========================================

    pub async fn get_page<T: MappedType>(
        &self,
        page_no: i64,
        page_size: i64,
        restrictions: &[Restriction],
    ) -> Result<PageResult<T>, SqlHausError> {
        let table = self.table_for::<T>();
        let count_sql = SqlHelper::select(table)
            .count("*")
            .where_restrictions(restrictions)?
            .to_count_string();
        let (data_sql, values) = Self::select_sql(table, restrictions)?;
        self.get_page_sql(&count_sql, &data_sql, page_no, page_size, &values)
            .await
    }

    /// Page filtered and ordered by encoded request parameters
    ///
    /// Keys under this `Dao`'s prefix become restrictions; a missing page size
    /// falls back to the configured default.
    pub async fn get_page_from_params<T, I, K, V>(
        &self,
        page_no: i64,
        page_size: Option<i64>,
        params: I,
    ) -> Result<PageResult<T>, SqlHausError>
    where
        T: MappedType,
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let restrictions = self.parse_params(params)?;
        let page_size = page_size.unwrap_or(self.default_page_size);
        self.get_page(page_no, page_size, &restrictions).await
    }

    /// Restrictions from the request parameters carrying this `Dao`'s key prefix
    pub fn parse_params<I, K, V>(&self, params: I) -> Result<Vec<Restriction>, QueryError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        QueryProperty::parse_all(params, &self.param_prefix)
    }

    /// Page over caller-written statements sharing one parameter list
    ///
    /// `data_sql` gets the limit clause appended for the resolved window.
    pub async fn get_page_sql<T: MappedType>(
        &self,
        count_sql: &str,
        data_sql: &str,
        page_no: i64,
        page_size: i64,
        params: &[SqlValue],
    ) -> Result<PageResult<T>, SqlHausError> {
        PageResult::paginate_async(
            page_no,
            page_size,
            || self.get_count_sql(count_sql, params),
            |window| async move {
                let sql = format!("{}{}", data_sql, window.limit_sql());
                self.get_list_sql::<T>(&sql, params).await
            },
        )
        .await
    }

    // ========================================
    // Writes
    // ========================================

    pub async fn execute(
        &self,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<ExecuteResult, SqlHausError> {
        self.executor.execute(sql, params).await
    }

    pub async fn delete(&self, restrictions: &[Restriction]) -> Result<u64, SqlHausError> {
        let where_sql = SqlGenerator::where_sql(restrictions)?;
        let sql = SqlHelper::delete(&self.table).where_phrase(&where_sql);
        self.log_sql("Delete", &sql);
        let result = self
            .executor
            .execute(&sql, &SqlGenerator::where_values(restrictions))
            .await?;
        Ok(result.rows_affected)
    }

    /// Delete by an auto-increment `id` column
    pub async fn delete_by_id(&self, id: i64) -> Result<u64, SqlHausError> {
        let sql = format!("delete from {} where id = ?", self.table);
        self.log_sql("Delete", &sql);
        let result = self.executor.execute(&sql, &[SqlValue::BigInt(id)]).await?;
        Ok(result.rows_affected)
    }

    fn insert_parts<T: MappedType>(
        &self,
        record: &T,
    ) -> Result<(String, Vec<SqlValue>), SqlHausError> {
        let (columns, values): (Vec<String>, Vec<SqlValue>) = record
            .field_values()
            .into_iter()
            .filter(|(_, value)| !value.is_null())
            .unzip();
        let sql = SqlHelper::insert(self.table_for::<T>()).column_list(&columns)?;
        self.log_sql("Insert", &sql);
        Ok((sql, values))
    }

    /// Insert the non-null columns of `record`
    pub async fn save<T: MappedType>(&self, record: &T) -> Result<u64, SqlHausError> {
        let (sql, values) = self.insert_parts(record)?;
        Ok(self.executor.execute(&sql, &values).await?.rows_affected)
    }

    /// Insert and return the generated auto-increment key
    pub async fn save_and_get_id<T: MappedType>(&self, record: &T) -> Result<u64, SqlHausError> {
        let (sql, values) = self.insert_parts(record)?;
        self.executor
            .execute(&sql, &values)
            .await?
            .last_insert_id
            .ok_or_else(|| {
                SqlHausError::UnexpectedResult(format!("no generated key for: {}", sql))
            })
    }

    fn primary_key_of<T: MappedType>() -> Result<Vec<&'static str>, QueryError> {
        let keys = T::primary_key();
        if keys.is_empty() {
            return Err(QueryError::invalid(format!(
                "no primary key declared on {}",
                std::any::type_name::<T>()
            )));
        }
        Ok(keys)
    }

    /// Update every non-key column by primary key
    ///
    /// With `ignore_null`, null columns are left out of the set list.
    pub async fn update_by_pk<T: MappedType>(
        &self,
        record: &T,
        ignore_null: bool,
    ) -> Result<u64, SqlHausError> {
        let keys = Self::primary_key_of::<T>()?;

        let mut set_columns = Vec::new();
        let mut values = Vec::new();
        let mut key_columns = Vec::new();
        let mut key_values = Vec::new();
        for (column, value) in record.field_values() {
            if ignore_null && value.is_null() {
                continue;
            }
            if keys.iter().any(|key| *key == column.as_str()) {
                key_columns.push(column);
                key_values.push(value);
            } else {
                set_columns.push(column);
                values.push(value);
            }
        }
        values.extend(key_values);

        let sql = SqlHelper::update(self.table_for::<T>())
            .set_columns(&set_columns)?
            .where_columns(&key_columns)?;
        self.log_sql("Update", &sql);
        Ok(self.executor.execute(&sql, &values).await?.rows_affected)
    }

    pub async fn delete_by_pk<T: MappedType>(&self, record: &T) -> Result<u64, SqlHausError> {
        let keys = Self::primary_key_of::<T>()?;
        let (columns, values): (Vec<String>, Vec<SqlValue>) = record
            .field_values()
            .into_iter()
            .filter(|(column, _)| keys.iter().any(|key| *key == column.as_str()))
            .unzip();
        if columns.is_empty() {
            return Err(QueryError::invalid(format!(
                "primary key columns {:?} are not mapped fields",
                keys
            ))
            .into());
        }

        let sql = SqlHelper::delete(self.table_for::<T>()).where_columns(&columns);
        self.log_sql("Delete", &sql);
        Ok(self.executor.execute(&sql, &values).await?.rows_affected)
    }

    /// `update <table> set <columns> where <restrictions>`
    pub async fn update(
        &self,
        columns: &Columns,
        restrictions: &[Restriction],
    ) -> Result<u64, SqlHausError> {
        let where_sql = SqlGenerator::where_sql(restrictions)?;
        let sql = SqlHelper::update(&self.table)
            .set(columns.set_phrase())
            .where_phrase(&where_sql);
        let mut values = columns.set_values().to_vec();
        values.extend(SqlGenerator::where_values(restrictions));
        self.log_sql("Update", &sql);
        Ok(self.executor.execute(&sql, &values).await?.rows_affected)
    }

    // ========================================
    // Named parameters
    // ========================================

    pub async fn named_query_list<T: MappedType>(
        &self,
        sql: &str,
        params: &HashMap<String, SqlValue>,
    ) -> Result<Vec<T>, SqlHausError> {
        let named = NamedSql::expand(sql, params)?;
        self.get_list_sql(&named.sql, &named.values).await
    }

    pub async fn named_query_i64(
        &self,
        sql: &str,
        params: &HashMap<String, SqlValue>,
    ) -> Result<i64, SqlHausError> {
        let named = NamedSql::expand(sql, params)?;
        self.get_count_sql(&named.sql, &named.values).await
    }

    pub async fn named_query_page<T: MappedType>(
        &self,
        count_sql: &str,
        data_sql: &str,
        params: &HashMap<String, SqlValue>,
        page_no: i64,
        page_size: i64,
    ) -> Result<PageResult<T>, SqlHausError> {
        let count = NamedSql::expand(count_sql, params)?;
        PageResult::paginate_async(
            page_no,
            page_size,
            || self.get_count_sql(&count.sql, &count.values),
            |window| async move {
                let sql = format!("{}{}", data_sql, window.limit_sql());
                let named = NamedSql::expand(&sql, params)?;
                self.get_list_sql::<T>(&named.sql, &named.values).await
            },
        )
        .await
    }

    pub async fn named_update(
        &self,
        sql: &str,
        params: &HashMap<String, SqlValue>,
    ) -> Result<u64, SqlHausError> {
        let named = NamedSql::expand(sql, params)?;
        self.log_sql("Update", &named.sql);
        Ok(self
            .executor
            .execute(&named.sql, &named.values)
            .await?
            .rows_affected)
    }

    /// Named insert returning the generated key, if any
    pub async fn named_save(
        &self,
        sql: &str,
        params: &HashMap<String, SqlValue>,
    ) -> Result<Option<u64>, SqlHausError> {
        let named = NamedSql::expand(sql, params)?;
        self.log_sql("Insert", &named.sql);
        Ok(self
            .executor
            .execute(&named.sql, &named.values)
            .await?
            .last_insert_id)
    }
}
