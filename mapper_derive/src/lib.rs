//! Procedural macros for row mapping metadata
//!
//! This crate provides the `MappedType` derive, which generates the field
//! introspection the sql-object row mapper and data access layer rely on.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod mapped_impl;
mod parsing;

use mapped_impl::generate_mapped_type_impl;
use parsing::{parse_field_attributes, parse_table_attributes};

/// Derive macro for the MappedType trait
///
/// The struct must have named fields and implement `Default`.
///
/// ```rust,ignore
/// use sql_object::MappedType;
///
/// #[derive(Debug, Default, MappedType)]
/// #[mapper(table = "m_user", primary_key = "id")]
/// pub struct User {
///     pub id: i64,
///
///     #[mapper(name = "user_name")]
///     pub name: String,
///
///     #[mapper(converter = sql_object::mapper::BooleanConverter)]
///     pub enabled: bool,
///
///     #[mapper(ignore)]
///     pub display_label: String,
///
///     #[mapper(flatten)]
///     pub audit: Audit,
/// }
/// ```
#[proc_macro_derive(MappedType, attributes(mapper))]
pub fn derive_mapped_type(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let table_info = match parse_table_attributes(&input.attrs) {
        Ok(info) => info,
        Err(e) => return e.to_compile_error().into(),
    };

    let field_info = match parse_field_attributes(&input.data) {
        Ok(info) => info,
        Err(e) => return e.to_compile_error().into(),
    };

    TokenStream::from(generate_mapped_type_impl(&input, &table_info, &field_info))
}
