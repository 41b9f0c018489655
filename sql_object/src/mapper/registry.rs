//! Per-type field tables and shared converter instances

use crate::mapper::{ConverterKind, RowMapper, TypeConverter};
use crate::traits::{FieldDescriptor, MappedType};
use cache_system::{CacheStats, TypeCache};
use serde::Serialize;
use std::any::TypeId;
use std::sync::Arc;

/// Field to column table derived once per record type
#[derive(Debug, Clone)]
pub struct FieldTable {
    type_name: &'static str,
    entries: Vec<FieldDescriptor>,
}

impl FieldTable {
    /// Walk the descriptors of `T`
    ///
    /// Ignored fields stay in the table since they are still filled from rows.
    /// A field described twice keeps its first descriptor.
    pub fn describe<T: MappedType>() -> Self {
        let mut entries: Vec<FieldDescriptor> = Vec::new();
        for descriptor in T::describe_fields() {
            if entries.iter().any(|e| e.field == descriptor.field) {
                continue;
            }
            entries.push(descriptor);
        }
        Self {
            type_name: std::any::type_name::<T>(),
            entries,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn get(&self, field: &str) -> Option<&FieldDescriptor> {
        self.entries.iter().find(|e| e.field == field)
    }

    /// Column mapped for `field`
    pub fn column(&self, field: &str) -> Option<&'static str> {
        self.get(field).map(|e| e.column)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RegistryStats {
    pub field_tables: CacheStats,
    pub converters: CacheStats,
}

/// Process-wide mapping state, shared by handing out clones of an `Arc`
///
/// Field tables are computed at most once per type and never invalidated.
#[derive(Debug)]
pub struct MapperRegistry {
    fields: TypeCache<FieldTable>,
    converters: TypeCache<dyn TypeConverter>,
}

impl Default for MapperRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MapperRegistry {
    pub fn new() -> Self {
        Self {
            fields: TypeCache::new("field-tables"),
            converters: TypeCache::new("converters"),
        }
    }

    pub fn field_table<T: MappedType>(&self) -> Arc<FieldTable> {
        self.fields.get_or_insert_with(TypeId::of::<T>(), || {
            let table = FieldTable::describe::<T>();
            tracing::debug!(
                "Mapped {} fields for {}",
                table.len(),
                table.type_name()
            );
            Arc::new(table)
        })
    }

    /// Shared instance of the converter `kind` names
    pub fn converter(&self, kind: &ConverterKind) -> Arc<dyn TypeConverter> {
        self.converters
            .get_or_insert_with(kind.type_id(), || {
                tracing::debug!("Instantiating converter {}", kind.name());
                kind.instantiate()
            })
    }

    /// Row mapper for `T` with its converters already resolved
    pub fn mapper<T: MappedType>(&self) -> RowMapper<T> {
        let table = self.field_table::<T>();
        let converters = table
            .iter()
            .map(|e| e.converter.as_ref().map(|kind| self.converter(kind)))
            .collect();
        RowMapper::new(table, converters)
    }

    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            field_tables: self.fields.stats(),
            converters: self.converters.stats(),
        }
    }

    /// Drop every cached table and converter
    pub fn clear(&self) {
        self.fields.clear();
        self.converters.clear();
    }
}
