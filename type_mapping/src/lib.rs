//! Dynamic SQL value model shared across the sqlhaus ecosystem
//! This crate provides the values bound to placeholders, the rows read back from a driver,
//! and the coercion rules used when a raw column value is assigned to a typed field.

pub mod coerce;
pub mod errors;
pub mod row;
pub mod scalar;
pub mod types;

pub use coerce::FromSqlValue;
pub use errors::ValueError;
pub use row::SqlRow;
pub use scalar::ScalarType;
pub use types::SqlValue;
