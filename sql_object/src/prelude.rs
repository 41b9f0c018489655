//! Convenience re-exports for common sql-object usage

// Builders
pub use crate::appender::{LikeMode, SqlAppender};
pub use crate::helper::{Columns, SqlHelper};
pub use crate::named::NamedSql;

// Restrictions
pub use crate::query_property::QueryProperty;
pub use crate::restriction::{BoundSymbol, Operator, Restriction, SqlGenerator};

// Paging
pub use crate::pagination::{PageResult, PageWindow};

// Mapping
pub use crate::mapper::{BooleanConverter, MapperRegistry, RowMapper, TypeConverter};
pub use crate::traits::{FieldDescriptor, MappedType};

// Error types
pub use crate::errors::{MappingError, QueryError};

// Value model
pub use type_mapping::{FromSqlValue, SqlRow, SqlValue};
