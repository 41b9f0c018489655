//! Code generation for the MappedType implementation

use crate::parsing::{unraw, FieldInfo, TableInfo};
use proc_macro2::TokenStream;
use quote::quote;
use syn::DeriveInput;

pub fn generate_mapped_type_impl(
    input: &DeriveInput,
    table_info: &TableInfo,
    fields: &[FieldInfo],
) -> TokenStream {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    // Ignored fields are still read from rows; they are only left out of writes
    let plain: Vec<&FieldInfo> = fields.iter().filter(|f| !f.flatten).collect();
    let mapped: Vec<&FieldInfo> = plain.iter().copied().filter(|f| !f.ignore).collect();
    let flattened: Vec<&FieldInfo> = fields.iter().filter(|f| f.flatten).collect();
    let flat_types: Vec<_> = flattened.iter().map(|f| &f.ty).collect();
    let flat_idents: Vec<_> = flattened.iter().map(|f| &f.ident).collect();

    let table_name = match &table_info.name {
        Some(table) => quote! { ::core::option::Option::Some(#table) },
        None => quote! { ::core::option::Option::None },
    };

    // Declared keys win; otherwise the first flattened type that has one
    let primary_key = if table_info.primary_key.is_empty() {
        quote! {
            let mut keys: ::std::vec::Vec<&'static str> = ::std::vec::Vec::new();
            #(
                if keys.is_empty() {
                    keys = <#flat_types as ::sql_object::MappedType>::primary_key();
                }
            )*
            keys
        }
    } else {
        let keys = &table_info.primary_key;
        quote! { ::std::vec![#(#keys),*] }
    };

    let describe = fields.iter().map(|f| {
        let ty = &f.ty;
        if f.flatten {
            return quote! {
                fields.extend(<#ty as ::sql_object::MappedType>::describe_fields());
            };
        }
        let field = unraw(&f.ident);
        let column = &f.column;
        let ignore = f.ignore;
        let converter = match &f.converter {
            Some(path) => quote! {
                ::core::option::Option::Some(::sql_object::ConverterKind::of::<#path>())
            },
            None => quote! { ::core::option::Option::None },
        };
        quote! {
            fields.push(::sql_object::FieldDescriptor {
                field: #field,
                column: #column,
                converter: #converter,
                ignore: #ignore,
            });
        }
    });

    let accepted_names = plain.iter().map(|f| unraw(&f.ident));

    let assign_arms = plain.iter().map(|f| {
        let field = unraw(&f.ident);
        let ident = &f.ident;
        let ty = &f.ty;
        quote! {
            #field => {
                if value.is_null()
                    && !<#ty as ::sql_object::type_mapping::FromSqlValue>::ACCEPTS_NULL
                {
                    return ::core::result::Result::Ok(true);
                }
                self.#ident =
                    <#ty as ::sql_object::type_mapping::FromSqlValue>::from_sql_value(&value)?;
                ::core::result::Result::Ok(true)
            }
        }
    });

    let value_pushes = mapped.iter().map(|f| {
        let ident = &f.ident;
        let column = &f.column;
        quote! {
            values.push((
                ::std::string::String::from(#column),
                ::sql_object::type_mapping::SqlValue::from(::core::clone::Clone::clone(&self.#ident)),
            ));
        }
    });

    quote! {
        impl #impl_generics ::sql_object::MappedType for #name #ty_generics #where_clause {
            fn table_name() -> ::core::option::Option<&'static str> {
                #table_name
            }

            #[allow(unused_mut)]
            fn primary_key() -> ::std::vec::Vec<&'static str> {
                #primary_key
            }

            #[allow(unused_mut)]
            fn describe_fields() -> ::std::vec::Vec<::sql_object::FieldDescriptor> {
                let mut fields = ::std::vec::Vec::new();
                #(#describe)*
                fields
            }

            fn accepts_field(field: &str) -> bool {
                match field {
                    #(#accepted_names => true,)*
                    _ => {
                        #(
                            if <#flat_types as ::sql_object::MappedType>::accepts_field(field) {
                                return true;
                            }
                        )*
                        false
                    }
                }
            }

            #[allow(unused_variables)]
            fn assign(
                &mut self,
                field: &str,
                value: ::sql_object::type_mapping::SqlValue,
            ) -> ::core::result::Result<bool, ::sql_object::type_mapping::ValueError> {
                match field {
                    #(#assign_arms)*
                    _ => {
                        #(
                            if <#flat_types as ::sql_object::MappedType>::accepts_field(field) {
                                return <#flat_types as ::sql_object::MappedType>::assign(
                                    &mut self.#flat_idents,
                                    field,
                                    value,
                                );
                            }
                        )*
                        ::core::result::Result::Ok(false)
                    }
                }
            }

            #[allow(unused_mut)]
            fn field_values(
                &self,
            ) -> ::std::vec::Vec<(::std::string::String, ::sql_object::type_mapping::SqlValue)> {
                let mut values = ::std::vec::Vec::new();
                #(#value_pushes)*
                #(
                    values.extend(<#flat_types as ::sql_object::MappedType>::field_values(
                        &self.#flat_idents,
                    ));
                )*
                values
            }
        }
    }
}
