//! Traits for row mapping
//!
//! This module contains the introspection capability that row mappers and
//! the data access layer rely on.

pub mod mapped;

pub use mapped::{FieldDescriptor, MappedType};
