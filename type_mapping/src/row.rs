//! Driver-neutral result rows

use crate::coerce::FromSqlValue;
use crate::errors::ValueError;
use crate::types::SqlValue;

/// One result row: ordered column labels paired with raw values
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlRow {
    columns: Vec<String>,
    values: Vec<SqlValue>,
}

impl SqlRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a row from parallel column/value lists; extra entries on either side are dropped
    pub fn from_parts(columns: Vec<String>, values: Vec<SqlValue>) -> Self {
        let len = columns.len().min(values.len());
        let mut columns = columns;
        let mut values = values;
        columns.truncate(len);
        values.truncate(len);
        Self { columns, values }
    }

    /// Builder-style column push
    pub fn with(mut self, column: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.push(column, value);
        self
    }

    pub fn push(&mut self, column: impl Into<String>, value: impl Into<SqlValue>) {
        self.columns.push(column.into());
        self.values.push(value.into());
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    /// Column labels are matched case-insensitively, first match wins
    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(column))
            .and_then(|idx| self.values.get(idx))
    }

    pub fn get_index(&self, idx: usize) -> Option<&SqlValue> {
        self.values.get(idx)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    /// Typed read of a column; a missing column reads as null
    pub fn try_get<T: FromSqlValue>(&self, column: &str) -> Result<T, ValueError> {
        match self.get(column) {
            Some(value) => T::from_sql_value(value),
            None => T::from_sql_value(&SqlValue::Null),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.columns
            .iter()
            .map(|c| c.as_str())
            .zip(self.values.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_lookup() {
        let row = SqlRow::new().with("USER_NAME", "alice").with("age", 30);
        assert_eq!(row.get("user_name"), Some(&SqlValue::from("alice")));
        assert!(row.contains("AGE"));
        assert!(!row.contains("email"));
        assert_eq!(row.len(), 2);
    }

    #[test]
    fn test_try_get_coerces_and_missing_is_null() {
        let row = SqlRow::new().with("id", 7i64);
        let id: i32 = row.try_get("id").unwrap();
        assert_eq!(id, 7);

        let missing: Option<String> = row.try_get("name").unwrap();
        assert_eq!(missing, None);
        assert!(row.try_get::<i64>("name").is_err());
    }

    #[test]
    fn test_from_parts_truncates_to_shorter_side() {
        let row = SqlRow::from_parts(
            vec!["a".to_string(), "b".to_string()],
            vec![SqlValue::Int(1)],
        );
        assert_eq!(row.columns(), &["a".to_string()]);
        assert_eq!(row.values().len(), 1);
    }
}
