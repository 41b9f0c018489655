//! Restriction list rendering
//!
//! This module provides SQL text and parameter list generation for lists of
//! restrictions. The output keeps a fixed byte format: every fragment ends in
//! one space, and ordering is written as `order by a asc , b desc `.

use crate::errors::QueryError;
use crate::restriction::{BoundSymbol, OperatorFamily, Restriction};
use std::collections::HashMap;
use type_mapping::SqlValue;

/// `content` repeated `count` times, joined by `separator`
pub fn repeat(content: &str, separator: &str, count: usize) -> String {
    vec![content; count].join(separator)
}

pub struct SqlGenerator;

impl SqlGenerator {
    /// Render predicates then the trailing order-by clause
    ///
    /// The first predicate that renders gets no connective, whatever was set on it.
    pub fn restriction_sql(restrictions: &[Restriction]) -> Result<String, QueryError> {
        let mut sql = String::new();
        let mut orders: Vec<&Restriction> = Vec::new();
        let mut emitted = 0usize;

        for restriction in restrictions {
            if !restriction.is_matched() {
                continue;
            }
            if restriction.operator().is_order() {
                orders.push(restriction);
                continue;
            }
            if !restriction.is_present() {
                continue;
            }

            let bound = if emitted == 0 {
                BoundSymbol::Empty
            } else {
                restriction.bound()
            };
            sql.push_str(&restriction.render(bound)?);
            emitted += 1;
        }

        for (idx, order) in orders.iter().enumerate() {
            if idx == 0 {
                sql.push_str("order by ");
            } else {
                sql.push_str(", ");
            }
            sql.push_str(order.field());
            sql.push(' ');
            sql.push_str(order.operator().sql());
            sql.push(' ');
        }

        Ok(sql)
    }

    /// Restriction text for a where position; no `where` keyword is added here
    pub fn where_sql(restrictions: &[Restriction]) -> Result<String, QueryError> {
        Self::restriction_sql(restrictions)
    }

    /// Positional values, in the order their placeholders were rendered
    pub fn where_values(restrictions: &[Restriction]) -> Vec<SqlValue> {
        let mut values = Vec::new();
        for restriction in restrictions.iter().filter(|r| r.is_present()) {
            match restriction.operator().family() {
                OperatorFamily::Single => values.extend(restriction.value().cloned()),
                OperatorFamily::Multi => values.extend(restriction.values().iter().cloned()),
                OperatorFamily::NullCheck | OperatorFamily::Order => {}
            }
        }
        values
    }

    /// Render text and collect values in one pass
    pub fn build(restrictions: &[Restriction]) -> Result<(String, Vec<SqlValue>), QueryError> {
        let sql = Self::restriction_sql(restrictions)?;
        Ok((sql, Self::where_values(restrictions)))
    }

    /// Field name to value, for named-parameter statements
    ///
    /// Multi-value operators map to a `List`; null-check and ordering entries are left out.
    /// Later entries for the same field overwrite earlier ones.
    pub fn value_map(restrictions: &[Restriction]) -> HashMap<String, SqlValue> {
        let mut map = HashMap::new();
        for restriction in restrictions {
            match restriction.operator().family() {
                OperatorFamily::Single => {
                    let value = restriction.value().cloned().unwrap_or(SqlValue::Null);
                    map.insert(restriction.field().to_string(), value);
                }
                OperatorFamily::Multi => {
                    map.insert(
                        restriction.field().to_string(),
                        SqlValue::List(restriction.values().to_vec()),
                    );
                }
                OperatorFamily::NullCheck | OperatorFamily::Order => {}
            }
        }
        map
    }

    /// Pair columns with values as equality restrictions
    pub fn from_columns<S, V>(columns: &[S], values: Vec<V>) -> Result<Vec<Restriction>, QueryError>
    where
        S: AsRef<str>,
        V: Into<SqlValue>,
    {
        if columns.len() != values.len() {
            return Err(QueryError::ArgumentMismatch {
                keys: columns.len(),
                values: values.len(),
            });
        }
        Ok(columns
            .iter()
            .zip(values)
            .map(|(column, value)| Restriction::eq(column.as_ref(), value))
            .collect())
    }
}
