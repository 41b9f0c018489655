//! Update statement builder

use crate::errors::QueryError;
use crate::helper::join_columns;

#[derive(Debug, Clone)]
pub struct Update {
    sql: String,
}

impl Update {
    pub fn table(table: &str) -> Self {
        Self {
            sql: format!("update {} set ", table),
        }
    }

    /// Appends `a = ?, b = ? `
    pub fn set_columns<S: AsRef<str>>(mut self, columns: &[S]) -> Result<Self, QueryError> {
        if columns.is_empty() {
            return Err(QueryError::invalid("Column list can not be empty."));
        }
        self.sql.push_str(&join_columns(columns, " = ?, ", " = ? "));
        Ok(self)
    }

    /// Appends a hand-written set phrase followed by one space
    pub fn set(mut self, phrase: &str) -> Self {
        self.sql.push_str(phrase);
        self.sql.push(' ');
        self
    }

    /// Finishes with `where a = ? and b = ?`
    pub fn where_columns<S: AsRef<str>>(mut self, columns: &[S]) -> Result<String, QueryError> {
        if columns.is_empty() {
            return Err(QueryError::invalid("Column list can not be empty."));
        }
        self.sql.push_str("where ");
        self.sql.push_str(&join_columns(columns, " = ? and ", " = ?"));
        Ok(self.sql)
    }

    /// Finishes with `where <phrase> `; a blank phrase only adds the trailing space
    pub fn where_phrase(mut self, phrase: &str) -> String {
        if phrase.trim().is_empty() {
            self.sql.push(' ');
            return self.sql;
        }
        self.sql.push_str("where ");
        self.sql.push_str(phrase);
        self.sql.push(' ');
        self.sql
    }

    pub fn to_sql_string(&self) -> String {
        self.sql.clone()
    }
}
