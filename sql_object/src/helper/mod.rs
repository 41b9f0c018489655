//! Statement builders
//!
//! This module provides fluent builders for insert, delete, update and select
//! statements. Insert, delete and update finish with a plain `String`; select
//! stays chainable until `to_sql_string`, `to_count_string` or `to_string`.

use crate::errors::QueryError;

pub mod columns;
pub mod delete;
pub mod insert;
pub mod select;
pub mod update;

#[cfg(test)]
mod tests;

pub use columns::Columns;
pub use delete::Delete;
pub use insert::Insert;
pub use select::Select;
pub use update::Update;

/// Entry points for the statement builders
pub struct SqlHelper;

impl SqlHelper {
    pub fn insert(table: &str) -> Insert {
        Insert::table(table)
    }

    pub fn delete(table: &str) -> Delete {
        Delete::table(table)
    }

    pub fn update(table: &str) -> Update {
        Update::table(table)
    }

    pub fn select(table: &str) -> Select {
        Select::table(table)
    }

    /// MySQL page suffix: ` limit <start>,<size>`
    ///
    /// Page numbers below 1 are treated as page 1. An offset that does not fit
    /// in an `i64` is an `InvalidArgument`.
    pub fn limit_sql(page_no: i64, page_size: i64) -> Result<String, QueryError> {
        let start = (page_no.max(1) - 1).checked_mul(page_size).ok_or_else(|| {
            QueryError::invalid(format!(
                "page {} of size {} is out of range",
                page_no, page_size
            ))
        })?;
        Ok(format!(" limit {},{}", start, page_size))
    }
}

/// `a<sep>b<sep>c<last>`
pub(crate) fn join_columns<S: AsRef<str>>(columns: &[S], separator: &str, last: &str) -> String {
    let mut out = columns
        .iter()
        .map(|c| c.as_ref())
        .collect::<Vec<_>>()
        .join(separator);
    out.push_str(last);
    out
}
