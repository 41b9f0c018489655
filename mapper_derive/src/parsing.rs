//! Parsing utilities for mapper attributes
//!
//! This module handles the parsing of `#[mapper(...)]` attributes on structs and
//! fields, and validation of table and column names.

use syn::{Attribute, Data, Error, Fields, Ident, LitStr, Path, Result, Type};

/// Validate table name and return syn::Error for better proc macro error handling
///
/// Schema-qualified names (`schema.table`) are accepted.
pub fn validate_table_name_syn(name: &str, span: proc_macro2::Span) -> Result<()> {
    name.split('.')
        .try_for_each(validate_identifier)
        .map_err(|e| Error::new(span, format!("Invalid table name '{}': {}", name, e)))
}

/// Validate column name and return syn::Error for better proc macro error handling
pub fn validate_column_name_syn(name: &str, span: proc_macro2::Span) -> Result<()> {
    validate_identifier(name)
        .map_err(|e| Error::new(span, format!("Invalid column name '{}': {}", name, e)))
}

fn validate_identifier(name: &str) -> std::result::Result<(), String> {
    if name.is_empty() {
        return Err("Name cannot be empty".to_string());
    }

    // MySQL identifier limit
    if name.len() > 64 {
        return Err(format!(
            "Name '{}' is too long: {} characters (max 64)",
            name,
            name.len()
        ));
    }

    let first_char = name
        .chars()
        .next()
        .ok_or_else(|| "Name cannot be empty".to_string())?;
    if !first_char.is_ascii_alphabetic() && first_char != '_' {
        return Err(format!(
            "Name '{}' must start with a letter or underscore",
            name
        ));
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(format!("Name '{}' contains invalid characters: only alphanumeric characters and underscores are allowed", name));
    }

    Ok(())
}

#[derive(Debug, Default)]
pub struct TableInfo {
    pub name: Option<String>,
    pub primary_key: Vec<String>,
}

#[derive(Debug)]
pub struct FieldInfo {
    pub ident: Ident,
    pub ty: Type,
    pub column: String,
    pub converter: Option<Path>,
    pub ignore: bool,
    pub flatten: bool,
}

pub fn parse_table_attributes(attrs: &[Attribute]) -> Result<TableInfo> {
    let mut info = TableInfo::default();

    for attr in attrs.iter().filter(|a| a.path().is_ident("mapper")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("table") {
                let lit: LitStr = meta.value()?.parse()?;
                validate_table_name_syn(&lit.value(), lit.span())?;
                info.name = Some(lit.value());
                Ok(())
            } else if meta.path.is_ident("primary_key") {
                let lit: LitStr = meta.value()?.parse()?;
                let keys: Vec<String> = lit
                    .value()
                    .split(',')
                    .map(|k| k.trim().to_string())
                    .filter(|k| !k.is_empty())
                    .collect();
                if keys.is_empty() {
                    return Err(Error::new(lit.span(), "primary_key needs at least one column"));
                }
                for key in &keys {
                    validate_column_name_syn(key, lit.span())?;
                }
                info.primary_key = keys;
                Ok(())
            } else {
                Err(meta.error("unsupported mapper attribute: expected `table` or `primary_key`"))
            }
        })?;
    }

    Ok(info)
}

fn parse_field(field: &syn::Field) -> Result<FieldInfo> {
    let ident = field
        .ident
        .clone()
        .ok_or_else(|| Error::new_spanned(field, "Field must have a name"))?;
    let mut column = None;
    let mut converter = None;
    let mut ignore = false;
    let mut flatten = false;

    for attr in field.attrs.iter().filter(|a| a.path().is_ident("mapper")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let lit: LitStr = meta.value()?.parse()?;
                validate_column_name_syn(&lit.value(), lit.span())?;
                column = Some(lit.value());
                Ok(())
            } else if meta.path.is_ident("converter") {
                converter = Some(meta.value()?.parse::<Path>()?);
                Ok(())
            } else if meta.path.is_ident("ignore") {
                ignore = true;
                Ok(())
            } else if meta.path.is_ident("flatten") {
                flatten = true;
                Ok(())
            } else {
                Err(meta.error(
                    "unsupported mapper attribute: expected `name`, `converter`, `ignore` or `flatten`",
                ))
            }
        })?;
    }

    if flatten && (column.is_some() || converter.is_some() || ignore) {
        return Err(Error::new_spanned(
            &ident,
            "flatten cannot be combined with name, converter or ignore",
        ));
    }

    let column = column.unwrap_or_else(|| unraw(&ident));

    Ok(FieldInfo {
        ident,
        ty: field.ty.clone(),
        column,
        converter,
        ignore,
        flatten,
    })
}

/// Field name without the `r#` prefix of raw identifiers
pub fn unraw(ident: &Ident) -> String {
    let name = ident.to_string();
    match name.strip_prefix("r#") {
        Some(stripped) => stripped.to_string(),
        None => name,
    }
}

pub fn parse_field_attributes(data: &Data) -> Result<Vec<FieldInfo>> {
    if let Data::Struct(data_struct) = data {
        if let Fields::Named(fields_named) = &data_struct.fields {
            return fields_named.named.iter().map(parse_field).collect();
        }
    }

    Err(Error::new(
        proc_macro2::Span::call_site(),
        "MappedType can only be derived for structs with named fields",
    ))
}
