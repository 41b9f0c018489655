//! Encoded filter keys
//!
//! This module parses loosely-typed key/value input, such as web query
//! parameters, into restrictions. Keys look like `TYPE-OP-FIELD`
//! (`S-LIKE-username`, `L-IN-id`) or `OP-FIELD` for ordering (`OA-id`,
//! `OD-username`). In bulk form every key carries a prefix: `Q-S-EQ-name`.

use crate::errors::QueryError;
use crate::restriction::{Operator, Restriction};
use std::fmt;
use type_mapping::{ScalarType, SqlValue};

pub const DEFAULT_PREFIX: &str = "Q";

/// Operator codes accepted in encoded keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchType {
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    Like,
    NotLike,
    In,
    NotIn,
    Between,
    OrderAsc,
    OrderDesc,
}

impl MatchType {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "EQ" => Some(MatchType::Eq),
            "NE" => Some(MatchType::Ne),
            "LT" => Some(MatchType::Lt),
            "GT" => Some(MatchType::Gt),
            "LE" => Some(MatchType::Le),
            "GE" => Some(MatchType::Ge),
            "LIKE" => Some(MatchType::Like),
            "NLIKE" => Some(MatchType::NotLike),
            "IN" => Some(MatchType::In),
            "NI" => Some(MatchType::NotIn),
            "BT" => Some(MatchType::Between),
            "OA" => Some(MatchType::OrderAsc),
            "OD" => Some(MatchType::OrderDesc),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            MatchType::Eq => "EQ",
            MatchType::Ne => "NE",
            MatchType::Lt => "LT",
            MatchType::Gt => "GT",
            MatchType::Le => "LE",
            MatchType::Ge => "GE",
            MatchType::Like => "LIKE",
            MatchType::NotLike => "NLIKE",
            MatchType::In => "IN",
            MatchType::NotIn => "NI",
            MatchType::Between => "BT",
            MatchType::OrderAsc => "OA",
            MatchType::OrderDesc => "OD",
        }
    }

    pub fn operator(&self) -> Operator {
        match self {
            MatchType::Eq => Operator::Eq,
            MatchType::Ne => Operator::NotEq,
            MatchType::Lt => Operator::Lt,
            MatchType::Gt => Operator::Gt,
            MatchType::Le => Operator::Le,
            MatchType::Ge => Operator::Ge,
            MatchType::Like => Operator::Like,
            MatchType::NotLike => Operator::NotLike,
            MatchType::In => Operator::In,
            MatchType::NotIn => Operator::NotIn,
            MatchType::Between => Operator::Between,
            MatchType::OrderAsc => Operator::OrderAsc,
            MatchType::OrderDesc => Operator::OrderDesc,
        }
    }

    pub fn is_order(&self) -> bool {
        matches!(self, MatchType::OrderAsc | MatchType::OrderDesc)
    }

    /// Whether the raw value is a comma-separated list
    pub fn splits_value(&self) -> bool {
        matches!(self, MatchType::In | MatchType::NotIn | MatchType::Between)
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    None,
    Single(SqlValue),
    Many(Vec<SqlValue>),
}

/// A parsed key/value pair
#[derive(Debug, Clone, PartialEq)]
pub struct QueryProperty {
    pub property_name: String,
    pub property_value: PropertyValue,
    pub scalar_type: Option<ScalarType>,
    pub match_type: MatchType,
}

impl QueryProperty {
    /// Parse one key without prefix, e.g. `S-LIKE-username` or `OD-created_at`
    pub fn parse(key: &str, raw: &str) -> Result<Self, QueryError> {
        let (head, rest) = key
            .split_once('-')
            .ok_or_else(|| QueryError::MalformedKey(key.to_string()))?;

        if head.starts_with('O') {
            let match_type = MatchType::from_code(head)
                .filter(MatchType::is_order)
                .ok_or_else(|| QueryError::UnknownOperator(head.to_string()))?;
            if rest.is_empty() {
                return Err(QueryError::MalformedKey(key.to_string()));
            }
            return Ok(Self {
                property_name: rest.to_string(),
                property_value: PropertyValue::None,
                scalar_type: None,
                match_type,
            });
        }

        let scalar_type =
            ScalarType::from_code(head).ok_or_else(|| QueryError::UnknownType(head.to_string()))?;
        let (op_code, field) = rest
            .split_once('-')
            .ok_or_else(|| QueryError::MalformedKey(key.to_string()))?;
        let match_type = MatchType::from_code(op_code)
            .filter(|m| !m.is_order())
            .ok_or_else(|| QueryError::UnknownOperator(op_code.to_string()))?;
        if field.is_empty() {
            return Err(QueryError::MalformedKey(key.to_string()));
        }

        let convert = |piece: &str| {
            scalar_type
                .parse(piece)
                .map_err(|source| QueryError::Conversion {
                    key: key.to_string(),
                    source,
                })
        };

        let property_value = if match_type.splits_value() {
            PropertyValue::Many(raw.split(',').map(convert).collect::<Result<Vec<_>, _>>()?)
        } else {
            PropertyValue::Single(convert(raw)?)
        };

        Ok(Self {
            property_name: field.to_string(),
            property_value,
            scalar_type: Some(scalar_type),
            match_type,
        })
    }

    pub fn to_restriction(&self) -> Restriction {
        let restriction = Restriction::new(self.match_type.operator(), self.property_name.as_str());
        match &self.property_value {
            PropertyValue::None => restriction,
            PropertyValue::Single(value) => restriction.with_value(value.clone()),
            PropertyValue::Many(values) => restriction.with_values(values.iter().cloned()),
        }
    }

    /// Convert every prefixed, non-empty entry into a restriction
    ///
    /// Keys are kept when they start with `prefix` followed by `-`; other keys are
    /// ignored. Output order follows the iterator, so pass an ordered collection
    /// when the rendered SQL must be stable.
    pub fn parse_all<I, K, V>(params: I, prefix: &str) -> Result<Vec<Restriction>, QueryError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut restrictions = Vec::new();
        for (key, value) in params {
            let Some(encoded) = key
                .as_ref()
                .strip_prefix(prefix)
                .and_then(|rest| rest.strip_prefix('-'))
            else {
                continue;
            };
            let value = value.as_ref();
            if value.is_empty() {
                continue;
            }
            restrictions.push(Self::parse(encoded, value)?.to_restriction());
        }
        Ok(restrictions)
    }

    /// `parse_all` with the `Q` prefix
    pub fn parse_all_default<I, K, V>(params: I) -> Result<Vec<Restriction>, QueryError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        Self::parse_all(params, DEFAULT_PREFIX)
    }
}
