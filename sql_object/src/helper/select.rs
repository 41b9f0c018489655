//! Select statement builder

use crate::errors::QueryError;
use crate::helper::join_columns;
use crate::restriction::{Restriction, SqlGenerator};
use std::fmt;

/// Chainable select builder
///
/// Join, on, where, group-by and having fragments are kept in call order and
/// written after `select <columns> from <table> `.
#[derive(Debug, Clone)]
pub struct Select {
    table: String,
    columns: String,
    count_columns: String,
    use_count: bool,
    sql: String,
}

impl Select {
    pub fn table(table: &str) -> Self {
        Self {
            table: table.to_string(),
            columns: "*".to_string(),
            count_columns: "*".to_string(),
            use_count: false,
            sql: String::new(),
        }
    }

    /// Switch `to_string` to the count form
    pub fn count(mut self, columns: &str) -> Self {
        self.use_count = true;
        self.count_columns = columns.to_string();
        self
    }

    /// Result columns as one phrase, e.g. `"name, age"`
    pub fn columns(mut self, columns: &str) -> Self {
        self.columns = columns.to_string();
        self
    }

    pub fn column_list<S: AsRef<str>>(mut self, columns: &[S]) -> Self {
        self.columns = join_columns(columns, ",", "");
        self
    }

    fn keyword(mut self, keyword: &str, text: &str) -> Self {
        self.sql.push_str(keyword);
        self.sql.push(' ');
        self.sql.push_str(text);
        self.sql.push(' ');
        self
    }

    pub fn left_join(self, table: &str) -> Self {
        self.keyword("left join", table)
    }

    pub fn right_join(self, table: &str) -> Self {
        self.keyword("right join", table)
    }

    pub fn inner_join(self, table: &str) -> Self {
        self.keyword("inner join", table)
    }

    pub fn on(self, condition: &str) -> Self {
        self.keyword("on", condition)
    }

    pub fn group_by(self, columns: &str) -> Self {
        self.keyword("group by", columns)
    }

    pub fn having(self, expression: &str) -> Self {
        self.keyword("having", expression)
    }

    /// Append rendered restrictions behind `where `
    ///
    /// When only ordering survives rendering, the `order by` text is appended
    /// without a `where` prefix. Nothing is appended when no restriction renders.
    pub fn where_restrictions(mut self, restrictions: &[Restriction]) -> Result<Self, QueryError> {
        let rendered = SqlGenerator::where_sql(restrictions)?;
        if rendered.is_empty() {
            return Ok(self);
        }
        if !rendered.starts_with("order by") {
            self.sql.push_str("where ");
        }
        self.sql.push_str(&rendered);
        Ok(self)
    }

    /// Append `where <phrase>`; a blank phrase appends nothing
    pub fn where_phrase(mut self, phrase: &str) -> Self {
        if phrase.trim().is_empty() {
            return self;
        }
        self.sql.push_str("where ");
        self.sql.push_str(phrase);
        self
    }

    fn finish(&self, head: String) -> String {
        let mut out = head;
        if !self.sql.is_empty() {
            out.push_str(&self.sql);
            out.push(' ');
        }
        out
    }

    pub fn to_sql_string(&self) -> String {
        self.finish(format!("select {} from {} ", self.columns, self.table))
    }

    pub fn to_count_string(&self) -> String {
        self.finish(format!(
            "select count({}) from {} ",
            self.count_columns, self.table
        ))
    }
}

impl fmt::Display for Select {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.use_count {
            f.write_str(&self.to_count_string())
        } else {
            f.write_str(&self.to_sql_string())
        }
    }
}
