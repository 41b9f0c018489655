//! Row to record mapping

use crate::errors::MappingError;
use crate::mapper::{FieldTable, TypeConverter};
use crate::traits::MappedType;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use type_mapping::SqlRow;

/// Fills `T` records from rows using a cached field table
///
/// Columns a row does not carry are skipped, so one record type serves
/// queries that select different column subsets.
pub struct RowMapper<T> {
    table: Arc<FieldTable>,
    converters: Vec<Option<Arc<dyn TypeConverter>>>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for RowMapper<T> {
    fn clone(&self) -> Self {
        Self {
            table: Arc::clone(&self.table),
            converters: self.converters.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for RowMapper<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowMapper")
            .field("type", &self.table.type_name())
            .field("fields", &self.table.len())
            .finish()
    }
}

impl<T: MappedType> RowMapper<T> {
    pub(crate) fn new(
        table: Arc<FieldTable>,
        converters: Vec<Option<Arc<dyn TypeConverter>>>,
    ) -> Self {
        Self {
            table,
            converters,
            _marker: PhantomData,
        }
    }

    pub fn field_table(&self) -> &FieldTable {
        &self.table
    }

    pub fn map_row(&self, row: &SqlRow) -> Result<T, MappingError> {
        let type_name = self.table.type_name();
        let mut target = T::new_instance()?;

        for (descriptor, converter) in self.table.iter().zip(&self.converters) {
            let Some(raw) = row.get(descriptor.column) else {
                continue;
            };

            let value = match converter {
                Some(converter) => {
                    converter
                        .convert(raw.clone())
                        .map_err(|source| MappingError::Converter {
                            type_name,
                            field: descriptor.field.to_string(),
                            converter: converter.name(),
                            source,
                        })?
                }
                None => raw.clone(),
            };

            let written = target
                .assign(descriptor.field, value)
                .map_err(|source| MappingError::Assignment {
                    type_name,
                    field: descriptor.field.to_string(),
                    column: descriptor.column.to_string(),
                    source,
                })?;
            if !written {
                return Err(MappingError::NoAccessor {
                    type_name,
                    field: descriptor.field.to_string(),
                });
            }
        }

        Ok(target)
    }

    pub fn map_rows(&self, rows: &[SqlRow]) -> Result<Vec<T>, MappingError> {
        rows.iter().map(|row| self.map_row(row)).collect()
    }
}
