//! Named parameter expansion
//!
//! This module rewrites `:name` placeholders into positional `?` markers so that
//! statements built with named parameters run on a positional driver. List
//! values expand into one marker per element.

use crate::errors::QueryError;
use std::collections::HashMap;
use type_mapping::SqlValue;

/// A statement with positional markers and its ordered values
#[derive(Debug, Clone, PartialEq)]
pub struct NamedSql {
    pub sql: String,
    pub values: Vec<SqlValue>,
}

impl NamedSql {
    /// Expand `:name` markers outside quoted text
    ///
    /// `::` is kept as is, so casts pass through. A name missing from `params`
    /// fails with `MissingParameter`; an empty list fails with `InvalidArgument`.
    pub fn expand(sql: &str, params: &HashMap<String, SqlValue>) -> Result<Self, QueryError> {
        let mut out = String::with_capacity(sql.len());
        let mut values = Vec::new();
        let mut quote: Option<char> = None;
        let mut chars = sql.char_indices().peekable();

        while let Some((idx, c)) = chars.next() {
            if let Some(open) = quote {
                out.push(c);
                if c == open {
                    quote = None;
                }
                continue;
            }

            match c {
                '\'' | '"' | '`' => {
                    quote = Some(c);
                    out.push(c);
                }
                ':' => match chars.peek().copied() {
                    Some((_, ':')) => {
                        chars.next();
                        out.push_str("::");
                    }
                    Some((_, next)) if next.is_ascii_alphabetic() || next == '_' => {
                        let start = idx + 1;
                        let mut end = start;
                        while let Some(&(pos, ch)) = chars.peek() {
                            if ch.is_ascii_alphanumeric() || ch == '_' {
                                end = pos + ch.len_utf8();
                                chars.next();
                            } else {
                                break;
                            }
                        }
                        let name = &sql[start..end];
                        let value = params
                            .get(name)
                            .ok_or_else(|| QueryError::MissingParameter(name.to_string()))?;
                        Self::push_value(name, value, &mut out, &mut values)?;
                    }
                    _ => out.push(c),
                },
                _ => out.push(c),
            }
        }

        Ok(Self { sql: out, values })
    }

    fn push_value(
        name: &str,
        value: &SqlValue,
        out: &mut String,
        values: &mut Vec<SqlValue>,
    ) -> Result<(), QueryError> {
        match value {
            SqlValue::List(items) => {
                if items.is_empty() {
                    return Err(QueryError::invalid(format!(
                        "named list parameter '{}' is empty",
                        name
                    )));
                }
                out.push_str(&vec!["?"; items.len()].join(", "));
                values.extend(items.iter().cloned());
            }
            other => {
                out.push('?');
                values.push(other.clone());
            }
        }
        Ok(())
    }

    pub fn into_parts(self) -> (String, Vec<SqlValue>) {
        (self.sql, self.values)
    }
}
