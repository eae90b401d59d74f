use miette::{Diagnostic, NamedSource, SourceSpan};
use xmldb_codec::{CodecError, Malformed, Violation};
use xmldb_core::SchemaError;

/// A diagnostic wrapping a `CodecError` for rich miette rendering.
///
/// The module-level `#[allow(unused_assignments)]` in main.rs is required
/// because miette's derive macro generates assignment patterns that rustc
/// flags as unused.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("{message}")]
pub struct CodecDiagnostic {
    #[source_code]
    src: NamedSource<String>,

    #[label("{label}")]
    span: SourceSpan,

    message: String,
    label: String,

    #[help]
    suggestion: Option<String>,
}

/// Convert a `CodecError` into a miette `CodecDiagnostic`.
pub fn codec_error_to_diagnostic(error: &CodecError, source: &str, filename: &str) -> CodecDiagnostic {
    let span = error.span();
    let (label, suggestion) = match error {
        CodecError::MalformedInput { problem, .. } => describe_malformed(problem),
        CodecError::InvalidStructure { violation, .. } => describe_violation(violation),
    };

    CodecDiagnostic {
        src: NamedSource::new(filename, source.to_string()),
        span: (span.start, span.end.saturating_sub(span.start)).into(),
        message: error.to_string(),
        label,
        suggestion,
    }
}

fn describe_malformed(problem: &Malformed) -> (String, Option<String>) {
    match problem {
        Malformed::InvalidToken => (
            "unrecognized markup".to_string(),
            Some("Only elements and quoted attributes are allowed; escape '&' as '&amp;'.".to_string()),
        ),
        Malformed::UnexpectedEndOfInput { expected } => (
            "input ended here".to_string(),
            Some(format!("Add {expected} to complete the document.")),
        ),
        Malformed::MismatchedClosingTag { expected, .. } => (
            format!("expected </{expected}>"),
            Some(format!("Close <{expected}> before closing its parent.")),
        ),
        Malformed::DuplicateAttribute { attribute, .. } => (
            "attribute repeated".to_string(),
            Some(format!("Remove one of the {attribute} attributes.")),
        ),
        Malformed::InvalidEntity { .. } => (
            "unknown entity".to_string(),
            Some("Use &amp; &lt; &gt; &quot; &apos; or a numeric reference.".to_string()),
        ),
        Malformed::MissingElement { expected, .. } => (
            format!("<{expected}> expected here"),
            Some("TABLE children must appear in the order FIELDS, KEYS, INDEXES.".to_string()),
        ),
        Malformed::MissingAttribute { attribute, .. } => (
            format!("missing {attribute}"),
            None,
        ),
        Malformed::UnknownAttribute { .. } => ("undeclared attribute".to_string(), None),
        Malformed::UnexpectedElement { .. } | Malformed::UnexpectedRoot { .. } => {
            ("not allowed here".to_string(), None)
        }
        Malformed::UnexpectedToken { expected, .. } => (format!("expected {expected}"), None),
        Malformed::NestingTooDeep { .. } => (
            "nested too deep".to_string(),
            Some("An install.xml nests at most XMLDB/TABLES/TABLE/FIELDS/FIELD.".to_string()),
        ),
        _ => ("malformed".to_string(), None),
    }
}

fn describe_violation(violation: &Violation) -> (String, Option<String>) {
    match violation {
        Violation::InvalidBoolean { .. } => (
            "not a boolean".to_string(),
            Some("Use \"true\" or \"false\".".to_string()),
        ),
        Violation::InvalidNumber { .. } => ("not a number".to_string(), None),
        Violation::UnknownFieldType(_) => ("unknown field type".to_string(), None),
        Violation::UnknownKeyType(_) => ("unknown key type".to_string(), None),
        Violation::InvalidList { .. } => (
            "empty list entry".to_string(),
            Some("Separate names with \", \" and drop trailing commas.".to_string()),
        ),
        Violation::IncompleteReference { .. } => (
            "incomplete reference".to_string(),
            Some("Set both REFTABLE and REFFIELDS.".to_string()),
        ),
        Violation::Schema(e) => describe_schema_error(e),
        _ => ("invalid".to_string(), None),
    }
}

fn describe_schema_error(error: &SchemaError) -> (String, Option<String>) {
    match error {
        SchemaError::InvalidTableName(_) | SchemaError::InvalidFieldName(_) => (
            "invalid name".to_string(),
            Some("Names are lowercase letters, digits and underscores, starting with a letter.".to_string()),
        ),
        SchemaError::TableNameTooLong { max, .. } | SchemaError::FieldNameTooLong { max, .. } => (
            "name too long".to_string(),
            Some(format!("Shorten the name to at most {max} characters or raise [limits] in xmldb.toml.")),
        ),
        SchemaError::UnknownKeyField { field, .. } | SchemaError::UnknownIndexField { field, .. } => (
            format!("'{field}' is not a field of this table"),
            None,
        ),
        SchemaError::UnknownReferencedField { table, field, .. } => (
            format!("'{table}' has no field '{field}'"),
            None,
        ),
        SchemaError::MissingPrimaryKey(_) => (
            "no primary key".to_string(),
            Some("Add <KEY NAME=\"primary\" TYPE=\"primary\" FIELDS=\"id\"/>.".to_string()),
        ),
        SchemaError::MultipleSequences(_) => (
            "second sequence".to_string(),
            Some("A table has at most one SEQUENCE=\"true\" field.".to_string()),
        ),
        SchemaError::SequenceWithDefault(_) => (
            "sequence with default".to_string(),
            Some("Remove DEFAULT from the sequence field.".to_string()),
        ),
        SchemaError::MissingLength { .. } => ("LENGTH required".to_string(), None),
        SchemaError::LengthOutOfRange { max, .. } => (
            format!("LENGTH must be 1..={max}"),
            None,
        ),
        _ => ("violates a structural rule".to_string(), None),
    }
}

/// Render a codec error for a file as a miette report.
pub fn render_diagnostic(error: &CodecError, source: &str, filename: &str) -> miette::Report {
    miette::Report::new(codec_error_to_diagnostic(error, source, filename))
}
