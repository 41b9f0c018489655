//! Restriction operators
//!
//! This module provides the closed operator set and the SQL keyword each one renders to.

use crate::errors::QueryError;
use std::fmt;
use std::str::FromStr;

/// Comparison, membership, null-check and ordering operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,         // =
    NotEq,      // !=
    Lt,         // <
    Gt,         // >
    Le,         // <=
    Ge,         // >=
    Like,       // like
    NotLike,    // not like
    Between,    // between ? and ?
    In,         // in(...)
    NotIn,      // not in(...)
    IsNull,     // is null
    IsNotNull,  // is not null
    OrderAsc,   // asc
    OrderDesc,  // desc
}

/// How an operator consumes values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorFamily {
    /// One value bound to one placeholder
    Single,
    /// A value list (between, in, not in)
    Multi,
    /// No value, always rendered
    NullCheck,
    /// No value, rendered in the trailing order-by clause
    Order,
}

impl Operator {
    pub const ALL: [Operator; 15] = [
        Operator::Eq,
        Operator::NotEq,
        Operator::Lt,
        Operator::Gt,
        Operator::Le,
        Operator::Ge,
        Operator::Like,
        Operator::NotLike,
        Operator::Between,
        Operator::In,
        Operator::NotIn,
        Operator::IsNull,
        Operator::IsNotNull,
        Operator::OrderAsc,
        Operator::OrderDesc,
    ];

    /// SQL keyword
    pub fn sql(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::NotEq => "!=",
            Operator::Lt => "<",
            Operator::Gt => ">",
            Operator::Le => "<=",
            Operator::Ge => ">=",
            Operator::Like => "like",
            Operator::NotLike => "not like",
            Operator::Between => "between",
            Operator::In => "in",
            Operator::NotIn => "not in",
            Operator::IsNull => "is null",
            Operator::IsNotNull => "is not null",
            Operator::OrderAsc => "asc",
            Operator::OrderDesc => "desc",
        }
    }

    pub fn family(&self) -> OperatorFamily {
        match self {
            Operator::Between | Operator::In | Operator::NotIn => OperatorFamily::Multi,
            Operator::IsNull | Operator::IsNotNull => OperatorFamily::NullCheck,
            Operator::OrderAsc | Operator::OrderDesc => OperatorFamily::Order,
            _ => OperatorFamily::Single,
        }
    }

    pub fn is_single(&self) -> bool {
        self.family() == OperatorFamily::Single
    }

    pub fn is_multi(&self) -> bool {
        self.family() == OperatorFamily::Multi
    }

    pub fn is_null_check(&self) -> bool {
        self.family() == OperatorFamily::NullCheck
    }

    pub fn is_order(&self) -> bool {
        self.family() == OperatorFamily::Order
    }

    /// Resolve a SQL keyword, ignoring case and surrounding whitespace
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let wanted = keyword.trim().to_ascii_lowercase();
        Operator::ALL.into_iter().find(|op| op.sql() == wanted)
    }
}

impl FromStr for Operator {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::from_keyword(s).ok_or_else(|| QueryError::UnknownOperator(s.to_string()))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sql())
    }
}

/// Connective written in front of a rendered predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundSymbol {
    #[default]
    And,
    Or,
    Empty,
}

impl BoundSymbol {
    /// Prefix text: the keyword plus one space, or nothing
    pub fn prefix(&self) -> &'static str {
        match self {
            BoundSymbol::And => "and ",
            BoundSymbol::Or => "or ",
            BoundSymbol::Empty => "",
        }
    }
}
