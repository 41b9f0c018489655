//! Column value converters

use std::any::TypeId;
use std::fmt;
use std::sync::Arc;
use type_mapping::{SqlValue, ValueError};

/// Stateless transformation applied to a raw column value before assignment
pub trait TypeConverter: Send + Sync + 'static {
    fn convert(&self, value: SqlValue) -> Result<SqlValue, ValueError>;

    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Passes values through unchanged
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultConverter;

impl TypeConverter for DefaultConverter {
    fn convert(&self, value: SqlValue) -> Result<SqlValue, ValueError> {
        Ok(value)
    }

    fn name(&self) -> &'static str {
        "DefaultConverter"
    }
}

/// Reads flag-like columns as booleans
///
/// Numbers are true when non-zero. Text is true for `yes`, `ok`, `y`, `1` and `是`
/// (trimmed, case-insensitive). Null and everything else is false.
#[derive(Debug, Default, Clone, Copy)]
pub struct BooleanConverter;

impl BooleanConverter {
    const TRUE_WORDS: [&'static str; 5] = ["YES", "OK", "Y", "1", "是"];

    fn text_flag(text: &str) -> bool {
        let text = text.trim();
        Self::TRUE_WORDS
            .iter()
            .any(|word| word.eq_ignore_ascii_case(text))
    }
}

impl TypeConverter for BooleanConverter {
    fn convert(&self, value: SqlValue) -> Result<SqlValue, ValueError> {
        let flag = match value {
            SqlValue::Bool(b) => b,
            SqlValue::Int(n) => n != 0,
            SqlValue::BigInt(n) => n != 0,
            SqlValue::Double(n) => n != 0.0,
            SqlValue::Char(c) => Self::text_flag(&c.to_string()),
            SqlValue::Text(ref s) => Self::text_flag(s),
            _ => false,
        };
        Ok(SqlValue::Bool(flag))
    }

    fn name(&self) -> &'static str {
        "BooleanConverter"
    }
}

/// Names a converter type and how to build it
///
/// Identity is the converter's `TypeId`; the registry builds one shared
/// instance per kind.
#[derive(Clone, Copy)]
pub struct ConverterKind {
    type_id: TypeId,
    name: &'static str,
    factory: fn() -> Arc<dyn TypeConverter>,
}

fn make<C: TypeConverter + Default>() -> Arc<dyn TypeConverter> {
    Arc::new(C::default())
}

impl ConverterKind {
    pub fn of<C: TypeConverter + Default>() -> Self {
        Self {
            type_id: TypeId::of::<C>(),
            name: std::any::type_name::<C>(),
            factory: make::<C>,
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn instantiate(&self) -> Arc<dyn TypeConverter> {
        (self.factory)()
    }
}

impl PartialEq for ConverterKind {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ConverterKind {}

impl fmt::Debug for ConverterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ConverterKind").field(&self.name).finish()
    }
}
