use tracing::trace;
use xmldb_core::types::{
    DefaultValue, FieldDefinition, FieldName, FieldType, IndexDefinition, KeyDefinition, KeyKind,
    ObjectName, SchemaDocument, TableDefinition, TableName,
};
use xmldb_core::{Limits, SchemaError};

use crate::error::{CodecError, Malformed, Span, Violation};
use crate::parser::{Attribute, Element};

/// Builds the typed model from a grammar-valid element tree.
pub(crate) struct ModelBuilder<'a> {
    limits: &'a Limits,
}

impl<'a> ModelBuilder<'a> {
    pub(crate) fn new(limits: &'a Limits) -> Self {
        Self { limits }
    }

    pub(crate) fn build(&self, root: &Element) -> Result<SchemaDocument, CodecError> {
        let path = required(root, "PATH")?.value.clone();
        let version = required(root, "VERSION")?.value.clone();
        let comment = optional_text(root, "COMMENT");

        let mut tables = Vec::new();
        if let Some(section) = root.child("TABLES") {
            for element in &section.children {
                tables.push(self.build_table(element)?);
            }
        }

        SchemaDocument::new(path, version, comment, tables).map_err(|e| {
            let span = locate_document_error(root, &e);
            CodecError::structure(e, span)
        })
    }

    fn build_table(&self, element: &Element) -> Result<TableDefinition, CodecError> {
        let name_attr = required(element, "NAME")?;
        let name = TableName::new(name_attr.value.as_str())
            .and_then(|name| self.limits.check_table_name(&name).map(|()| name))
            .map_err(|e| CodecError::structure(e, name_attr.span.clone()))?;
        trace!(table = %name, "building table");

        let fields = section(element, "FIELDS")
            .map(|e| self.build_field(e))
            .collect::<Result<Vec<_>, _>>()?;
        let keys = section(element, "KEYS")
            .map(build_key)
            .collect::<Result<Vec<_>, _>>()?;
        let indexes = section(element, "INDEXES")
            .map(build_index)
            .collect::<Result<Vec<_>, _>>()?;

        TableDefinition::new_with_limits(
            name,
            optional_text(element, "COMMENT"),
            fields,
            keys,
            indexes,
            self.limits,
        )
        .map_err(|e| {
            let span = locate_table_error(element, &e);
            CodecError::structure(e, span)
        })
    }

    fn build_field(&self, element: &Element) -> Result<FieldDefinition, CodecError> {
        let name_attr = required(element, "NAME")?;
        let name = FieldName::new(name_attr.value.as_str())
            .and_then(|name| self.limits.check_field_name(&name).map(|()| name))
            .map_err(|e| CodecError::structure(e, name_attr.span.clone()))?;

        let type_attr = required(element, "TYPE")?;
        let field_type = FieldType::from_attr(&type_attr.value).ok_or_else(|| {
            CodecError::structure(
                Violation::UnknownFieldType(type_attr.value.clone()),
                type_attr.span.clone(),
            )
        })?;

        let mut field = FieldDefinition::new(name, field_type);
        if let Some(length) = number(element, "LENGTH")? {
            field = field.with_length(length);
        }
        if let Some(decimals) = number(element, "DECIMALS")? {
            field = field.with_decimals(decimals);
        }
        if boolean(element, "NOTNULL")? {
            field = field.not_null();
        }
        if boolean(element, "SEQUENCE")? {
            field = field.sequence();
        }
        if let Some(attr) = element.attribute("DEFAULT") {
            let default = DefaultValue::parse(field.name.as_str(), field_type, &attr.value)
                .map_err(|e| CodecError::structure(e, attr.span.clone()))?;
            field = field.with_default(default);
        }
        if let Some(comment) = optional_text(element, "COMMENT") {
            field = field.with_comment(comment);
        }

        field
            .validate()
            .map_err(|e| CodecError::structure(e, element.span.clone()))?;
        Ok(field)
    }
}

fn build_key(element: &Element) -> Result<KeyDefinition, CodecError> {
    let name = object_name(element)?;
    let type_attr = required(element, "TYPE")?;
    let kind = KeyKind::from_attr(&type_attr.value).ok_or_else(|| {
        CodecError::structure(
            Violation::UnknownKeyType(type_attr.value.clone()),
            type_attr.span.clone(),
        )
    })?;
    let fields = field_list(required(element, "FIELDS")?)?;
    let mut key = KeyDefinition::new(name, kind, fields);

    match (element.attribute("REFTABLE"), element.attribute("REFFIELDS")) {
        (Some(table_attr), Some(fields_attr)) => {
            let table = TableName::new(table_attr.value.as_str())
                .map_err(|e| CodecError::structure(e, table_attr.span.clone()))?;
            key = key.with_reference(table, field_list(fields_attr)?);
        }
        (None, None) => {}
        (Some(attr), None) | (None, Some(attr)) => {
            return Err(CodecError::structure(
                Violation::IncompleteReference {
                    key: key.name.to_string(),
                },
                attr.span.clone(),
            ));
        }
    }
    if let Some(comment) = optional_text(element, "COMMENT") {
        key = key.with_comment(comment);
    }

    key.validate()
        .map_err(|e| CodecError::structure(e, element.span.clone()))?;
    Ok(key)
}

fn build_index(element: &Element) -> Result<IndexDefinition, CodecError> {
    let name = object_name(element)?;
    let unique = boolean(element, "UNIQUE")?;
    let fields = field_list(required(element, "FIELDS")?)?;
    let mut index = IndexDefinition::new(name, unique, fields);

    if let Some(attr) = element.attribute("HINTS") {
        index = index.with_hints(list(attr)?.into_iter().map(str::to_string).collect());
    }
    if let Some(comment) = optional_text(element, "COMMENT") {
        index = index.with_comment(comment);
    }

    index
        .validate()
        .map_err(|e| CodecError::structure(e, element.span.clone()))?;
    Ok(index)
}

// -- Typed attribute readers --

fn required<'e>(element: &'e Element, name: &str) -> Result<&'e Attribute, CodecError> {
    element.attribute(name).ok_or_else(|| {
        CodecError::malformed(
            Malformed::MissingAttribute {
                element: element.name.clone(),
                attribute: name.to_string(),
            },
            element.span.clone(),
        )
    })
}

fn optional_text(element: &Element, name: &str) -> Option<String> {
    element.value(name).map(str::to_string)
}

fn section<'e>(table: &'e Element, name: &str) -> impl Iterator<Item = &'e Element> {
    table.child(name).into_iter().flat_map(|s| s.children.iter())
}

fn object_name(element: &Element) -> Result<ObjectName, CodecError> {
    let attr = required(element, "NAME")?;
    ObjectName::new(attr.value.as_str()).map_err(|e| CodecError::structure(e, attr.span.clone()))
}

fn boolean(element: &Element, name: &str) -> Result<bool, CodecError> {
    let attr = required(element, name)?;
    match attr.value.as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(CodecError::structure(
            Violation::InvalidBoolean {
                attribute: name.to_string(),
                value: other.to_string(),
            },
            attr.span.clone(),
        )),
    }
}

fn number(element: &Element, name: &str) -> Result<Option<u32>, CodecError> {
    let Some(attr) = element.attribute(name) else {
        return Ok(None);
    };
    let value = &attr.value;
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid_number(attr));
    }
    value
        .parse::<u32>()
        .map(Some)
        .map_err(|_| invalid_number(attr))
}

fn invalid_number(attr: &Attribute) -> CodecError {
    CodecError::structure(
        Violation::InvalidNumber {
            attribute: attr.name.clone(),
            value: attr.value.clone(),
        },
        attr.span.clone(),
    )
}

/// Splits a comma separated attribute, trimming whitespace around entries.
fn list(attr: &Attribute) -> Result<Vec<&str>, CodecError> {
    let items: Vec<&str> = attr.value.split(',').map(str::trim).collect();
    if items.iter().any(|s| s.is_empty()) {
        return Err(CodecError::structure(
            Violation::InvalidList {
                attribute: attr.name.clone(),
                value: attr.value.clone(),
            },
            attr.span.clone(),
        ));
    }
    Ok(items)
}

fn field_list(attr: &Attribute) -> Result<Vec<FieldName>, CodecError> {
    list(attr)?
        .into_iter()
        .map(|s| FieldName::new(s).map_err(|e| CodecError::structure(e, attr.span.clone())))
        .collect()
}

// -- Error location --

/// Finds the last child of `section` whose NAME is `name`.
fn named<'e>(table: &'e Element, section: &str, name: &str) -> Option<&'e Element> {
    table
        .child(section)?
        .children
        .iter()
        .rev()
        .find(|c| c.value("NAME") == Some(name))
}

fn locate_table_error(table: &Element, error: &SchemaError) -> Span {
    let target = match error {
        SchemaError::DuplicateField(n) | SchemaError::MultipleSequences(n) => {
            named(table, "FIELDS", n)
        }
        SchemaError::DuplicateKey(n)
        | SchemaError::MultiplePrimaryKeys(n)
        | SchemaError::UnknownKeyField { key: n, .. } => named(table, "KEYS", n),
        SchemaError::DuplicateIndex(n)
        | SchemaError::UnknownIndexField { index: n, .. }
        | SchemaError::InvalidHint { index: n, .. } => {
            named(table, "INDEXES", n)
        }
        _ => None,
    };
    target.map_or_else(|| table.span.clone(), |e| e.span.clone())
}

fn locate_document_error(root: &Element, error: &SchemaError) -> Span {
    let tables = root.child("TABLES");
    let target = match error {
        SchemaError::EmptyPath => root.attribute("PATH").map(|a| a.span.clone()),
        SchemaError::InvalidVersion(_) => root.attribute("VERSION").map(|a| a.span.clone()),
        SchemaError::DuplicateTable(n) => tables.and_then(|t| {
            t.children
                .iter()
                .rev()
                .find(|c| c.value("NAME") == Some(n.as_str()))
                .map(|c| c.span.clone())
        }),
        SchemaError::UnknownReferencedField { key, .. } => tables.and_then(|t| {
            t.children
                .iter()
                .find_map(|table| named(table, "KEYS", key))
                .map(|k| k.span.clone())
        }),
        _ => None,
    };
    target.unwrap_or_else(|| root.span.clone())
}
