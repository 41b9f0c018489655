//! Set-phrase accumulator for update statements

use type_mapping::SqlValue;

/// Collects `a = ?, b = ?` together with the values in the same order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Columns {
    phrase: String,
    values: Vec<SqlValue>,
}

impl Columns {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(column: &str, value: impl Into<SqlValue>) -> Self {
        Self::new().set(column, value)
    }

    pub fn set(mut self, column: &str, value: impl Into<SqlValue>) -> Self {
        if !self.values.is_empty() {
            self.phrase.push_str(", ");
        }
        self.phrase.push_str(column);
        self.phrase.push_str(" = ?");
        self.values.push(value.into());
        self
    }

    /// Adds the column only when `condition` holds
    pub fn set_if(self, condition: bool, column: &str, value: impl Into<SqlValue>) -> Self {
        if condition {
            self.set(column, value)
        } else {
            self
        }
    }

    pub fn set_phrase(&self) -> &str {
        &self.phrase
    }

    pub fn set_values(&self) -> &[SqlValue] {
        &self.values
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_parts(self) -> (String, Vec<SqlValue>) {
        (self.phrase, self.values)
    }
}
