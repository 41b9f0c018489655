//! Row mapping utilities
//!
//! This module maps query rows onto record types. Field tables and converter
//! instances are derived once per type and kept in a [`MapperRegistry`].

pub mod converter;
pub mod registry;
pub mod row_mapper;


pub use converter::{BooleanConverter, ConverterKind, DefaultConverter, TypeConverter};
pub use registry::{FieldTable, MapperRegistry, RegistryStats};
pub use row_mapper::RowMapper;
