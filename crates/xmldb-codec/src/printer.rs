use xmldb_core::types::{
    FieldDefinition, IndexDefinition, KeyDefinition, SchemaDocument, TableDefinition,
};

/// Location of the XSD relative to the component directory, after the `..` hops.
const SCHEMA_LOCATION: &str = "lib/xmldb/xmldb.xsd";

/// Print a document in canonical form.
///
/// Canonical form fixes the declaration line, the namespace attributes,
/// two-space indentation per level, attribute order per element kind and
/// self-closing leaf elements. Empty `INDEXES` and `TABLES` sections are
/// omitted. The output ends with a newline.
pub fn print(document: &SchemaDocument) -> String {
    let mut output = String::new();
    print_document(document, &mut output);
    output
}

fn print_document(document: &SchemaDocument, output: &mut String) {
    output.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\" ?>\n");
    output.push_str("<XMLDB");
    push_attr(output, "PATH", &document.path);
    push_attr(output, "VERSION", &document.version);
    if let Some(comment) = &document.comment {
        push_attr(output, "COMMENT", comment);
    }
    output.push('\n');
    output.push_str("    xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\"\n");
    output.push_str("    xsi:noNamespaceSchemaLocation=\"");
    output.push_str(&escape(&schema_location(&document.path)));
    output.push_str("\"\n");
    output.push_str(">\n");

    if !document.tables.is_empty() {
        output.push_str("  <TABLES>\n");
        for table in &document.tables {
            print_table(table, output);
        }
        output.push_str("  </TABLES>\n");
    }

    output.push_str("</XMLDB>\n");
}

fn print_table(table: &TableDefinition, output: &mut String) {
    output.push_str("    <TABLE");
    push_attr(output, "NAME", table.name.as_str());
    if let Some(comment) = &table.comment {
        push_attr(output, "COMMENT", comment);
    }
    output.push_str(">\n");

    output.push_str("      <FIELDS>\n");
    for field in &table.fields {
        print_field(field, output);
    }
    output.push_str("      </FIELDS>\n");

    output.push_str("      <KEYS>\n");
    for key in &table.keys {
        print_key(key, output);
    }
    output.push_str("      </KEYS>\n");

    if !table.indexes.is_empty() {
        output.push_str("      <INDEXES>\n");
        for index in &table.indexes {
            print_index(index, output);
        }
        output.push_str("      </INDEXES>\n");
    }

    output.push_str("    </TABLE>\n");
}

fn print_field(field: &FieldDefinition, output: &mut String) {
    output.push_str("        <FIELD");
    push_attr(output, "NAME", field.name.as_str());
    push_attr(output, "TYPE", field.field_type.as_str());
    if let Some(length) = field.length {
        push_attr(output, "LENGTH", &length.to_string());
    }
    push_attr(output, "NOTNULL", bool_str(field.not_null));
    if !field.sequence {
        if let Some(default) = &field.default {
            push_attr(output, "DEFAULT", &default.to_string());
        }
    }
    push_attr(output, "SEQUENCE", bool_str(field.sequence));
    if let Some(decimals) = field.decimals {
        push_attr(output, "DECIMALS", &decimals.to_string());
    }
    if let Some(comment) = &field.comment {
        push_attr(output, "COMMENT", comment);
    }
    output.push_str("/>\n");
}

fn print_key(key: &KeyDefinition, output: &mut String) {
    output.push_str("        <KEY");
    push_attr(output, "NAME", key.name.as_str());
    push_attr(output, "TYPE", key.kind.as_str());
    push_attr(output, "FIELDS", &join(key.fields.iter().map(|f| f.as_str())));
    if let Some(reference) = &key.reference {
        push_attr(output, "REFTABLE", reference.table.as_str());
        push_attr(
            output,
            "REFFIELDS",
            &join(reference.fields.iter().map(|f| f.as_str())),
        );
    }
    if let Some(comment) = &key.comment {
        push_attr(output, "COMMENT", comment);
    }
    output.push_str("/>\n");
}

fn print_index(index: &IndexDefinition, output: &mut String) {
    output.push_str("        <INDEX");
    push_attr(output, "NAME", index.name.as_str());
    push_attr(output, "UNIQUE", bool_str(index.unique));
    push_attr(output, "FIELDS", &join(index.fields.iter().map(|f| f.as_str())));
    if !index.hints.is_empty() {
        push_attr(output, "HINTS", &join(index.hints.iter().map(String::as_str)));
    }
    if let Some(comment) = &index.comment {
        push_attr(output, "COMMENT", comment);
    }
    output.push_str("/>\n");
}

fn push_attr(output: &mut String, name: &str, value: &str) {
    output.push(' ');
    output.push_str(name);
    output.push_str("=\"");
    output.push_str(&escape(value));
    output.push('"');
}

fn bool_str(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

fn join<'a>(items: impl Iterator<Item = &'a str>) -> String {
    items.collect::<Vec<_>>().join(", ")
}

/// `..` once per path segment, then the XSD location.
fn schema_location(path: &str) -> String {
    let mut location = String::new();
    for _ in path.split('/') {
        location.push_str("../");
    }
    location.push_str(SCHEMA_LOCATION);
    location
}

/// Escapes `&`, `<`, `>` and `"` for use inside a double-quoted attribute.
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
