//! Trait definitions
//!
//! This module defines the field introspection a type exposes to the mapper.

use crate::errors::MappingError;
use crate::mapper::ConverterKind;
use type_mapping::{SqlValue, ValueError};

/// One mapped field of a record type
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Field name on the record
    pub field: &'static str,
    /// Result-set column the field reads from
    pub column: &'static str,
    pub converter: Option<ConverterKind>,
    /// Mapped from rows but left out of insert and update values
    pub ignore: bool,
}

impl FieldDescriptor {
    pub fn new(field: &'static str) -> Self {
        Self {
            field,
            column: field,
            converter: None,
            ignore: false,
        }
    }

    pub fn column(mut self, column: &'static str) -> Self {
        self.column = column;
        self
    }

    pub fn converter(mut self, kind: ConverterKind) -> Self {
        self.converter = Some(kind);
        self
    }

    pub fn ignored(mut self) -> Self {
        self.ignore = true;
        self
    }
}

/// Field introspection for record types filled from query rows
///
/// This trait should be derived:
/// ```ignore
/// use sql_object::MappedType;
///
/// #[derive(Debug, Default, MappedType)]
/// #[mapper(table = "m_user", primary_key = "id")]
/// pub struct User {
///     pub id: i64,
///     #[mapper(name = "user_name")]
///     pub name: String,
///     #[mapper(converter = sql_object::mapper::BooleanConverter)]
///     pub enabled: bool,
///     #[mapper(ignore)]
///     pub cached_label: String,
/// }
/// ```
pub trait MappedType: Default + Send + 'static {
    /// Default table for data access helpers
    fn table_name() -> Option<&'static str> {
        None
    }

    /// Primary key columns, in declaration order
    fn primary_key() -> Vec<&'static str> {
        Vec::new()
    }

    /// Every field including flattened ones and ignored ones
    fn describe_fields() -> Vec<FieldDescriptor>;

    /// Whether `field` names a writable field, ignored ones included
    fn accepts_field(field: &str) -> bool {
        Self::describe_fields().iter().any(|d| d.field == field)
    }

    /// Blank record that mapped columns are written into
    fn new_instance() -> Result<Self, MappingError> {
        Ok(Self::default())
    }

    /// Write `value` into `field`; `Ok(false)` means there is no such writable field
    fn assign(&mut self, field: &str, value: SqlValue) -> Result<bool, ValueError>;

    /// Column and value pairs for insert and update statements, ignored fields excluded
    fn field_values(&self) -> Vec<(String, SqlValue)>;
}
