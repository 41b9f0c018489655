//! Delete statement builder

use crate::helper::join_columns;

#[derive(Debug, Clone)]
pub struct Delete {
    sql: String,
}

impl Delete {
    pub fn table(table: &str) -> Self {
        Self {
            sql: format!("delete from {} ", table),
        }
    }

    /// `delete from t where a = ? and b = ?`; an empty list leaves the bare statement
    pub fn where_columns<S: AsRef<str>>(mut self, columns: &[S]) -> String {
        if columns.is_empty() {
            return self.sql;
        }
        self.sql.push_str("where ");
        self.sql.push_str(&join_columns(columns, " = ? and ", " = ?"));
        self.sql
    }

    /// Appends `where <phrase>` verbatim; a blank phrase leaves the bare statement
    pub fn where_phrase(mut self, phrase: &str) -> String {
        if phrase.trim().is_empty() {
            return self.sql;
        }
        self.sql.push_str("where ");
        self.sql.push_str(phrase);
        self.sql
    }

    pub fn to_sql_string(&self) -> String {
        self.sql.clone()
    }
}
