//! Restriction predicates
//!
//! This module provides the `Restriction` value: one SQL predicate or one
//! ordering directive, plus the connective written in front of it and a
//! soft-disable flag. Lists of restrictions are rendered by [`SqlGenerator`].
//!
//! Restrictions whose value is absent are not errors. They are dropped at
//! render time, so callers can build one fixed candidate list per request and
//! let the presence of a value decide whether a filter takes part.

pub mod operator;
pub mod sql_generation;


pub use operator::{BoundSymbol, Operator, OperatorFamily};
pub use sql_generation::SqlGenerator;

use crate::errors::QueryError;
use type_mapping::SqlValue;

/// One predicate or ordering directive
#[derive(Debug, Clone, PartialEq)]
pub struct Restriction {
    field: String,
    operator: Operator,
    value: Option<SqlValue>,
    values: Vec<SqlValue>,
    bound: BoundSymbol,
    matched: bool,
}

impl Restriction {
    /// Create a restriction with no value
    pub fn new(operator: Operator, field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: None,
            values: Vec::new(),
            bound: BoundSymbol::And,
            matched: true,
        }
    }

    /// Set the single value; null is treated as no value
    pub fn with_value(mut self, value: impl Into<SqlValue>) -> Self {
        let value = value.into();
        self.value = if value.is_null() { None } else { Some(value) };
        self
    }

    /// Set the value list used by between/in/not in
    pub fn with_values<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<SqlValue>,
    {
        self.values = values.into_iter().map(Into::into).collect();
        self
    }

    /// Copy with the soft-disable flag set; unmatched restrictions are skipped when rendered
    pub fn matched(mut self, matched: bool) -> Self {
        self.matched = matched;
        self
    }

    /// Copy with an explicit connective
    pub fn with_bound(mut self, bound: BoundSymbol) -> Self {
        self.bound = bound;
        self
    }

    /// Copy joined with `or` instead of `and`
    pub fn or(restriction: Restriction) -> Restriction {
        restriction.with_bound(BoundSymbol::Or)
    }

    pub fn eq(field: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        Self::new(Operator::Eq, field).with_value(value)
    }

    pub fn not_eq(field: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        Self::new(Operator::NotEq, field).with_value(value)
    }

    pub fn lt(field: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        Self::new(Operator::Lt, field).with_value(value)
    }

    pub fn gt(field: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        Self::new(Operator::Gt, field).with_value(value)
    }

    pub fn le(field: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        Self::new(Operator::Le, field).with_value(value)
    }

    pub fn ge(field: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        Self::new(Operator::Ge, field).with_value(value)
    }

    /// `field like %value%`; an empty value yields a restriction that never renders
    pub fn like(field: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        Self::wrapped_like(field, value.into(), "%", "%")
    }

    /// `field like %value`
    pub fn like_left(field: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        Self::wrapped_like(field, value.into(), "%", "")
    }

    /// `field like value%`
    pub fn like_right(field: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        Self::wrapped_like(field, value.into(), "", "%")
    }

    fn wrapped_like(field: impl Into<String>, value: SqlValue, before: &str, after: &str) -> Self {
        let restriction = Self::new(Operator::Like, field);
        if value.is_empty() {
            return restriction;
        }
        restriction.with_value(format!("{}{}{}", before, value, after))
    }

    /// `field not like value`, the pattern is passed through untouched
    pub fn not_like(field: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        Self::new(Operator::NotLike, field).with_value(value)
    }

    pub fn between(
        field: impl Into<String>,
        low: impl Into<SqlValue>,
        high: impl Into<SqlValue>,
    ) -> Self {
        Self::new(Operator::Between, field).with_values([low.into(), high.into()])
    }

    pub fn in_list<I, V>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<SqlValue>,
    {
        Self::new(Operator::In, field).with_values(values)
    }

    pub fn not_in<I, V>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<SqlValue>,
    {
        Self::new(Operator::NotIn, field).with_values(values)
    }

    pub fn is_null(field: impl Into<String>) -> Self {
        Self::new(Operator::IsNull, field)
    }

    pub fn is_not_null(field: impl Into<String>) -> Self {
        Self::new(Operator::IsNotNull, field)
    }

    /// Ascending order; `fields` may be a comma-joined column list
    pub fn order_by_asc(fields: impl Into<String>) -> Self {
        Self::new(Operator::OrderAsc, fields)
    }

    pub fn order_by_desc(fields: impl Into<String>) -> Self {
        Self::new(Operator::OrderDesc, fields)
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn value(&self) -> Option<&SqlValue> {
        self.value.as_ref()
    }

    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    pub fn bound(&self) -> BoundSymbol {
        self.bound
    }

    pub fn is_matched(&self) -> bool {
        self.matched
    }

    /// Whether this restriction contributes a predicate when rendered in a list
    pub fn is_present(&self) -> bool {
        if !self.matched {
            return false;
        }
        match self.operator.family() {
            OperatorFamily::Single => self.value.is_some(),
            OperatorFamily::Multi => !self.values.is_empty(),
            OperatorFamily::NullCheck => true,
            OperatorFamily::Order => false,
        }
    }

    /// Render this restriction alone, with its own connective
    pub fn to_sql_fragment(&self) -> Result<String, QueryError> {
        self.render(self.bound)
    }

    pub(crate) fn render(&self, bound: BoundSymbol) -> Result<String, QueryError> {
        let prefix = bound.prefix();
        let field = &self.field;
        let op = self.operator.sql();

        let fragment = match self.operator.family() {
            OperatorFamily::Single => format!("{}{} {} ? ", prefix, field, op),
            OperatorFamily::NullCheck => format!("{}{} {} ", prefix, field, op),
            OperatorFamily::Order => format!("order by {} {} ", field, op),
            OperatorFamily::Multi if self.operator == Operator::Between => {
                if self.values.len() != 2 {
                    return Err(QueryError::invalid(format!(
                        "between must have two values, '{}' has {}",
                        field,
                        self.values.len()
                    )));
                }
                format!("{}{} {} ? and ? ", prefix, field, op)
            }
            OperatorFamily::Multi => format!(
                "{}{} {}({}) ",
                prefix,
                field,
                op,
                sql_generation::repeat("?", ",", self.values.len())
            ),
        };
        Ok(fragment)
    }
}
