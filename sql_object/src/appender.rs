//! Incremental SQL builder
//!
//! This module provides `SqlAppender`, a single-owner builder that grows a SQL
//! text buffer together with its parameters. Every append is gated by a
//! condition; a false condition leaves text and parameters untouched.
//!
//! ```rust
//! use sql_object::SqlAppender;
//!
//! let name: Option<&str> = Some("john");
//! let ids = vec![1i64, 2, 3];
//!
//! let appender = SqlAppender::new(false)
//!     .append("select * from m_user where 1 = 1 ")
//!     .append_like_if(name.is_some(), "and name like ? ", name)
//!     .append_in_if(!ids.is_empty(), "and id in", ids);
//!
//! assert_eq!(
//!     appender.sql(),
//!     "select * from m_user where 1 = 1 and name like ? and id in (?,?,?) "
//! );
//! assert_eq!(appender.params().len(), 4);
//! ```

use crate::errors::QueryError;
use crate::restriction::sql_generation::repeat;
use config::QueryConfig;
use std::collections::HashMap;
use type_mapping::SqlValue;

/// Wildcard placement for LIKE values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeMode {
    /// `%value%`
    Both,
    /// `%value`
    Left,
    /// `value%`
    Right,
}

impl LikeMode {
    pub fn wrap(&self, value: &SqlValue) -> SqlValue {
        let text = match self {
            LikeMode::Both => format!("%{}%", value),
            LikeMode::Left => format!("%{}", value),
            LikeMode::Right => format!("{}%", value),
        };
        SqlValue::Text(text)
    }
}

/// Named parameter pair
#[derive(Debug, Clone, PartialEq)]
pub struct Kv {
    pub key: String,
    pub value: SqlValue,
}

impl Kv {
    pub fn new(key: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// How an appended phrase binds its values
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    None,
    Positional(Vec<SqlValue>),
    /// Placeholders for the list are generated after the phrase: `phrase (?,?,?) `
    InList(Vec<SqlValue>),
    Like(LikeMode, SqlValue),
    Named(Vec<(String, SqlValue)>),
    NamedLike(LikeMode, String, SqlValue),
}

#[derive(Debug, Clone, Default)]
pub struct SqlAppender {
    sql: String,
    params: Vec<SqlValue>,
    named: HashMap<String, SqlValue>,
    append_whitespace: bool,
}

impl SqlAppender {
    /// Create an empty appender; `append_whitespace` adds one space after every phrase
    pub fn new(append_whitespace: bool) -> Self {
        Self {
            sql: String::with_capacity(512),
            append_whitespace,
            ..Default::default()
        }
    }

    pub fn from_config(config: &QueryConfig) -> Self {
        Self::new(config.append_whitespace)
    }

    pub fn with_phrase(phrase: &str) -> Self {
        Self::new(false).append(phrase)
    }

    pub fn with_values<I, V>(phrase: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<SqlValue>,
    {
        Self::new(false).append_values(phrase, values)
    }

    pub fn with_multi_keys<I, V>(phrase: &str, keys: &str, values: I) -> Result<Self, QueryError>
    where
        I: IntoIterator<Item = V>,
        V: Into<SqlValue>,
    {
        Self::new(false).append_multi_keys(phrase, keys, values)
    }

    /// Core append: no-op when `condition` is false
    pub fn append_conditional(mut self, condition: bool, phrase: &str, binding: Binding) -> Self {
        if !condition {
            return self;
        }

        match binding {
            Binding::None => self.push_phrase(phrase),
            Binding::Positional(values) => {
                self.push_phrase(phrase);
                self.params.extend(values);
            }
            Binding::InList(values) => {
                self.sql.push_str(phrase);
                self.sql.push_str(" (");
                self.sql.push_str(&repeat("?", ",", values.len()));
                self.push_phrase(") ");
                self.params.extend(values);
            }
            Binding::Like(mode, value) => {
                self.push_phrase(phrase);
                self.params.push(mode.wrap(&value));
            }
            Binding::Named(pairs) => {
                self.push_phrase(phrase);
                self.named.extend(pairs);
            }
            Binding::NamedLike(mode, key, value) => {
                self.push_phrase(phrase);
                self.named.insert(key, mode.wrap(&value));
            }
        }
        self
    }

    fn push_phrase(&mut self, phrase: &str) {
        self.sql.push_str(phrase);
        if self.append_whitespace {
            self.sql.push(' ');
        }
    }

    // Plain text

    pub fn append(self, phrase: &str) -> Self {
        self.append_if(true, phrase)
    }

    pub fn append_if(self, condition: bool, phrase: &str) -> Self {
        self.append_conditional(condition, phrase, Binding::None)
    }

    // Positional parameters

    pub fn append_value(self, phrase: &str, value: impl Into<SqlValue>) -> Self {
        self.append_value_if(true, phrase, value)
    }

    pub fn append_value_if(self, condition: bool, phrase: &str, value: impl Into<SqlValue>) -> Self {
        self.append_conditional(condition, phrase, Binding::Positional(vec![value.into()]))
    }

    pub fn append_if_not_null(self, phrase: &str, value: impl Into<SqlValue>) -> Self {
        let value = value.into();
        self.append_value_if(!value.is_null(), phrase, value)
    }

    pub fn append_if_not_empty(self, phrase: &str, value: impl Into<SqlValue>) -> Self {
        let value = value.into();
        self.append_value_if(!value.is_empty(), phrase, value)
    }

    pub fn append_if_not_blank(self, phrase: &str, value: impl Into<SqlValue>) -> Self {
        let value = value.into();
        self.append_value_if(!value.is_blank(), phrase, value)
    }

    pub fn append_values<I, V>(self, phrase: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<SqlValue>,
    {
        self.append_values_if(true, phrase, values)
    }

    pub fn append_values_if<I, V>(self, condition: bool, phrase: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<SqlValue>,
    {
        let values = collect_values(condition, values);
        self.append_conditional(condition, phrase, Binding::Positional(values))
    }

    /// `phrase (?,?,...) ` with one placeholder per element
    pub fn append_in<I, V>(self, phrase: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<SqlValue>,
    {
        self.append_in_if(true, phrase, values)
    }

    pub fn append_in_if<I, V>(self, condition: bool, phrase: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<SqlValue>,
    {
        let values = collect_values(condition, values);
        self.append_conditional(condition, phrase, Binding::InList(values))
    }

    // LIKE with positional parameters

    pub fn append_like_with(
        self,
        condition: bool,
        mode: LikeMode,
        phrase: &str,
        value: impl Into<SqlValue>,
    ) -> Self {
        self.append_conditional(condition, phrase, Binding::Like(mode, value.into()))
    }

    pub fn append_like(self, phrase: &str, value: impl Into<SqlValue>) -> Self {
        self.append_like_with(true, LikeMode::Both, phrase, value)
    }

    pub fn append_like_if(self, condition: bool, phrase: &str, value: impl Into<SqlValue>) -> Self {
        self.append_like_with(condition, LikeMode::Both, phrase, value)
    }

    pub fn append_like_if_not_null(self, phrase: &str, value: impl Into<SqlValue>) -> Self {
        let value = value.into();
        self.append_like_with(!value.is_null(), LikeMode::Both, phrase, value)
    }

    pub fn append_like_if_not_empty(self, phrase: &str, value: impl Into<SqlValue>) -> Self {
        let value = value.into();
        self.append_like_with(!value.is_empty(), LikeMode::Both, phrase, value)
    }

    pub fn append_like_if_not_blank(self, phrase: &str, value: impl Into<SqlValue>) -> Self {
        let value = value.into();
        self.append_like_with(!value.is_blank(), LikeMode::Both, phrase, value)
    }

    pub fn append_like_left(self, phrase: &str, value: impl Into<SqlValue>) -> Self {
        self.append_like_with(true, LikeMode::Left, phrase, value)
    }

    pub fn append_like_left_if(
        self,
        condition: bool,
        phrase: &str,
        value: impl Into<SqlValue>,
    ) -> Self {
        self.append_like_with(condition, LikeMode::Left, phrase, value)
    }

    pub fn append_like_right(self, phrase: &str, value: impl Into<SqlValue>) -> Self {
        self.append_like_with(true, LikeMode::Right, phrase, value)
    }

    pub fn append_like_right_if(
        self,
        condition: bool,
        phrase: &str,
        value: impl Into<SqlValue>,
    ) -> Self {
        self.append_like_with(condition, LikeMode::Right, phrase, value)
    }

    // Named parameters

    pub fn append_named(self, phrase: &str, key: &str, value: impl Into<SqlValue>) -> Self {
        self.append_named_if(true, phrase, key, value)
    }

    pub fn append_named_if(
        self,
        condition: bool,
        phrase: &str,
        key: &str,
        value: impl Into<SqlValue>,
    ) -> Self {
        self.append_conditional(
            condition,
            phrase,
            Binding::Named(vec![(key.to_string(), value.into())]),
        )
    }

    pub fn append_named_if_not_null(self, phrase: &str, key: &str, value: impl Into<SqlValue>) -> Self {
        let value = value.into();
        self.append_named_if(!value.is_null(), phrase, key, value)
    }

    pub fn append_named_if_not_empty(self, phrase: &str, key: &str, value: impl Into<SqlValue>) -> Self {
        let value = value.into();
        self.append_named_if(!value.is_empty(), phrase, key, value)
    }

    pub fn append_named_if_not_blank(self, phrase: &str, key: &str, value: impl Into<SqlValue>) -> Self {
        let value = value.into();
        self.append_named_if(!value.is_blank(), phrase, key, value)
    }

    /// Bind a list under one key; the phrase carries its own `(:key)`
    pub fn append_named_in<I, V>(self, phrase: &str, key: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<SqlValue>,
    {
        self.append_named_in_if(true, phrase, key, values)
    }

    pub fn append_named_in_if<I, V>(self, condition: bool, phrase: &str, key: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<SqlValue>,
    {
        let values = collect_values(condition, values);
        self.append_conditional(
            condition,
            phrase,
            Binding::Named(vec![(key.to_string(), SqlValue::List(values))]),
        )
    }

    pub fn append_named_like_with(
        self,
        condition: bool,
        mode: LikeMode,
        phrase: &str,
        key: &str,
        value: impl Into<SqlValue>,
    ) -> Self {
        self.append_conditional(
            condition,
            phrase,
            Binding::NamedLike(mode, key.to_string(), value.into()),
        )
    }

    pub fn append_named_like(self, phrase: &str, key: &str, value: impl Into<SqlValue>) -> Self {
        self.append_named_like_with(true, LikeMode::Both, phrase, key, value)
    }

    pub fn append_named_like_left(self, phrase: &str, key: &str, value: impl Into<SqlValue>) -> Self {
        self.append_named_like_with(true, LikeMode::Left, phrase, key, value)
    }

    pub fn append_named_like_right(self, phrase: &str, key: &str, value: impl Into<SqlValue>) -> Self {
        self.append_named_like_with(true, LikeMode::Right, phrase, key, value)
    }

    pub fn append_named_like_if_not_blank(
        self,
        phrase: &str,
        key: &str,
        value: impl Into<SqlValue>,
    ) -> Self {
        let value = value.into();
        self.append_named_like_with(!value.is_blank(), LikeMode::Both, phrase, key, value)
    }

    pub fn append_kv<I>(self, phrase: &str, kvs: I) -> Self
    where
        I: IntoIterator<Item = Kv>,
    {
        self.append_kv_if(true, phrase, kvs)
    }

    pub fn append_kv_if<I>(self, condition: bool, phrase: &str, kvs: I) -> Self
    where
        I: IntoIterator<Item = Kv>,
    {
        let pairs = if condition {
            kvs.into_iter().map(|kv| (kv.key, kv.value)).collect()
        } else {
            Vec::new()
        };
        self.append_conditional(condition, phrase, Binding::Named(pairs))
    }

    /// Bind a comma-separated key list to a parallel value list
    ///
    /// Keys are trimmed and blank keys dropped before counting.
    pub fn append_multi_keys<I, V>(self, phrase: &str, keys: &str, values: I) -> Result<Self, QueryError>
    where
        I: IntoIterator<Item = V>,
        V: Into<SqlValue>,
    {
        self.append_multi_keys_if(true, phrase, keys, values)
    }

    pub fn append_multi_keys_if<I, V>(
        self,
        condition: bool,
        phrase: &str,
        keys: &str,
        values: I,
    ) -> Result<Self, QueryError>
    where
        I: IntoIterator<Item = V>,
        V: Into<SqlValue>,
    {
        if !condition {
            return Ok(self);
        }

        let keys: Vec<String> = keys
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .collect();
        let values: Vec<SqlValue> = values.into_iter().map(Into::into).collect();
        if keys.len() != values.len() {
            return Err(QueryError::ArgumentMismatch {
                keys: keys.len(),
                values: values.len(),
            });
        }

        let pairs = keys.into_iter().zip(values).collect();
        Ok(self.append_conditional(true, phrase, Binding::Named(pairs)))
    }

    // Accessors

    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// The accumulated text, also written to the debug log
    pub fn sql_logged(&self) -> &str {
        tracing::debug!("Sql: {}", self.sql);
        &self.sql
    }

    /// The accumulated text, logged only when `show_sql` is set
    pub fn sql_with(&self, show_sql: bool) -> &str {
        if show_sql {
            self.sql_logged()
        } else {
            &self.sql
        }
    }

    pub fn params(&self) -> &[SqlValue] {
        &self.params
    }

    pub fn named_params(&self) -> &HashMap<String, SqlValue> {
        &self.named
    }

    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }

    pub fn into_parts(self) -> (String, Vec<SqlValue>, HashMap<String, SqlValue>) {
        (self.sql, self.params, self.named)
    }
}

fn collect_values<I, V>(condition: bool, values: I) -> Vec<SqlValue>
where
    I: IntoIterator<Item = V>,
    V: Into<SqlValue>,
{
    if condition {
        values.into_iter().map(Into::into).collect()
    } else {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_false_condition_is_a_no_op() {
        let appender = SqlAppender::new(true)
            .append_if(false, "never")
            .append_value_if(false, "x = ?", 1)
            .append_in_if(false, "and id in", [1, 2])
            .append_named_if(false, "y = :y", "y", 2);
        assert_eq!(appender.sql(), "");
        assert!(appender.params().is_empty());
        assert!(appender.named_params().is_empty());
    }

    #[test]
    fn test_whitespace_flag() {
        let appender = SqlAppender::new(true)
            .append("select *")
            .append("from t");
        assert_eq!(appender.sql(), "select * from t ");

        let appender = SqlAppender::new(false).append("a").append("b");
        assert_eq!(appender.sql(), "ab");
    }

    #[test]
    fn test_in_list_placeholders() {
        let appender = SqlAppender::new(false).append_in("and owner_id in", [3i64, 4, 5]);
        assert_eq!(appender.sql(), "and owner_id in (?,?,?) ");
        assert_eq!(appender.params().len(), 3);

        let appender = SqlAppender::new(true).append_in("and id in", [1]);
        assert_eq!(appender.sql(), "and id in (?)  ");
    }

    #[test]
    fn test_like_modes() {
        let appender = SqlAppender::new(false)
            .append_like("a like ? ", "x")
            .append_like_left("b like ? ", "y")
            .append_like_right("c like ? ", "z");
        assert_eq!(
            appender.params(),
            &[
                SqlValue::from("%x%"),
                SqlValue::from("%y"),
                SqlValue::from("z%")
            ]
        );
    }

    #[test]
    fn test_presence_guards() {
        let appender = SqlAppender::new(false)
            .append_if_not_null("a = ? ", None::<i32>)
            .append_if_not_empty("b = ? ", "")
            .append_if_not_blank("c = ? ", "   ")
            .append_if_not_blank("d = ? ", "ok")
            .append_like_if_not_empty("e like ? ", "");
        assert_eq!(appender.sql(), "d = ? ");
        assert_eq!(appender.params(), &[SqlValue::from("ok")]);
    }

    #[test]
    fn test_named_bindings() {
        let appender = SqlAppender::with_phrase("select * from t where 1 = 1 ")
            .append_named("and a = :a ", "a", 1)
            .append_named_in("and b in (:b) ", "b", ["x", "y"])
            .append_named_like_right("and c like :c ", "c", "pre")
            .append_kv("and d = :d and e = :e ", [Kv::new("d", 4), Kv::new("e", 5)]);

        let named = appender.named_params();
        assert_eq!(named["a"], SqlValue::Int(1));
        assert_eq!(
            named["b"],
            SqlValue::List(vec![SqlValue::from("x"), SqlValue::from("y")])
        );
        assert_eq!(named["c"], SqlValue::from("pre%"));
        assert_eq!(named["e"], SqlValue::Int(5));
        assert!(appender.params().is_empty());
    }

    #[test]
    fn test_multi_keys() {
        let appender = SqlAppender::with_multi_keys("a = :a and b = :b", " a, ,b ", [1, 2]).unwrap();
        assert_eq!(appender.named_params().len(), 2);
        assert_eq!(appender.named_params()["b"], SqlValue::Int(2));

        let err = SqlAppender::new(false)
            .append_multi_keys("a = :a", "a,b", [1])
            .unwrap_err();
        assert_eq!(err, QueryError::ArgumentMismatch { keys: 2, values: 1 });

        let untouched = SqlAppender::new(false)
            .append_multi_keys_if(false, "a = :a", "a,b", [1])
            .unwrap();
        assert!(untouched.is_empty());
    }

    #[test]
    fn test_from_config_and_into_parts() {
        let config = QueryConfig::default().with_append_whitespace(true);
        let (sql, params, named) = SqlAppender::from_config(&config)
            .append_values("x between ? and ?", [1, 9])
            .into_parts();
        assert_eq!(sql, "x between ? and ? ");
        assert_eq!(params, vec![SqlValue::Int(1), SqlValue::Int(9)]);
        assert!(named.is_empty());
    }
}
