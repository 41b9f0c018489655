//! SQL Object - Dynamic SQL construction and row mapping for sqlhaus
//!
//! This crate provides restriction predicates and their SQL rendering, encoded
//! query-key parsing, the `SqlAppender` and `SqlHelper` builders, named parameter
//! expansion, pagination and the cached row mapper.

extern crate self as sql_object;

pub mod appender;
pub mod errors;
pub mod helper;
pub mod mapper;
pub mod named;
pub mod pagination;
pub mod prelude;
pub mod query_property;
pub mod restriction;
pub mod traits;

pub use appender::{Binding, Kv, LikeMode, SqlAppender};
pub use errors::{MappingError, QueryError};
pub use helper::SqlHelper;
pub use mapper::{ConverterKind, MapperRegistry, RowMapper, TypeConverter};
pub use named::NamedSql;
pub use pagination::{PageResult, PageWindow};
pub use query_property::{MatchType, PropertyValue, QueryProperty};
pub use restriction::{BoundSymbol, Operator, Restriction, SqlGenerator};
pub use traits::*;

pub use mapper_derive::MappedType;
pub use type_mapping;
pub use type_mapping::{SqlRow, SqlValue};
