//! Insert statement builder

use crate::errors::QueryError;
use crate::helper::join_columns;
use crate::restriction::sql_generation::repeat;

#[derive(Debug, Clone)]
pub struct Insert {
    sql: String,
}

impl Insert {
    pub fn table(table: &str) -> Self {
        Self {
            sql: format!("insert into {}", table),
        }
    }

    /// Columns as one comma-separated phrase; pieces are kept verbatim, spacing included
    pub fn columns(self, phrase: &str) -> Result<String, QueryError> {
        let columns: Vec<&str> = phrase.split(',').collect();
        self.column_list(&columns)
    }

    /// `insert into t(a,b) values (?, ?)`
    pub fn column_list<S: AsRef<str>>(mut self, columns: &[S]) -> Result<String, QueryError> {
        if columns.is_empty() {
            return Err(QueryError::invalid("insert column list can not be empty"));
        }
        self.sql.push('(');
        self.sql.push_str(&join_columns(columns, ",", ""));
        self.sql.push_str(") values (");
        self.sql.push_str(&repeat("?", ", ", columns.len()));
        self.sql.push(')');
        Ok(self.sql)
    }
}
