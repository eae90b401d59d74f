use std::fmt;

/// A violated structural constraint of the XMLDB model.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SchemaError {
    /// Table name failed `[a-z][a-z0-9_]*` validation.
    InvalidTableName(String),
    /// Field name failed `[a-z][a-z0-9_]*` validation.
    InvalidFieldName(String),
    /// Key or index name was empty or contained whitespace.
    InvalidObjectName(String),
    /// Table name exceeds the configured maximum length.
    TableNameTooLong { name: String, max: usize },
    /// Field name exceeds the configured maximum length.
    FieldNameTooLong { name: String, max: usize },
    /// Document `PATH` attribute was empty.
    EmptyPath,
    /// Document `VERSION` attribute was not a run of digits.
    InvalidVersion(String),
    /// Two tables share a name.
    DuplicateTable(String),
    /// A table declares no fields.
    EmptyTable(String),
    /// A table declares no primary key.
    MissingPrimaryKey(String),
    /// Two fields of one table share a name.
    DuplicateField(String),
    /// Two keys of one table share a name.
    DuplicateKey(String),
    /// Two indexes of one table share a name.
    DuplicateIndex(String),
    /// A key lists no fields.
    EmptyKeyFields(String),
    /// An index lists no fields.
    EmptyIndexFields(String),
    /// An index hint is empty, contains a comma, or has surrounding whitespace.
    InvalidHint { index: String, hint: String },
    /// A key lists a field the table does not declare.
    UnknownKeyField { key: String, field: String },
    /// An index lists a field the table does not declare.
    UnknownIndexField { index: String, field: String },
    /// More than one primary key in a table.
    MultiplePrimaryKeys(String),
    /// A foreign key has no `REFTABLE`/`REFFIELDS`.
    MissingReference(String),
    /// A non-foreign key carries a reference.
    UnexpectedReference(String),
    /// A foreign key's field count differs from its reference field count.
    ReferenceArity {
        key: String,
        fields: usize,
        reffields: usize,
    },
    /// A foreign key references a field absent from a table in the same document.
    UnknownReferencedField {
        key: String,
        table: String,
        field: String,
    },
    /// More than one sequence field in a table.
    MultipleSequences(String),
    /// A sequence field is not of type `int`.
    SequenceNotInteger(String),
    /// A sequence field declares a default.
    SequenceWithDefault(String),
    /// The field type requires a `LENGTH`.
    MissingLength { field: String, field_type: String },
    /// The field type does not take a `LENGTH`.
    UnexpectedLength { field: String, field_type: String },
    /// `LENGTH` is outside the range allowed for the field type.
    LengthOutOfRange { field: String, length: u32, max: u32 },
    /// The field type does not take `DECIMALS`.
    UnexpectedDecimals { field: String, field_type: String },
    /// `DECIMALS` exceeds `LENGTH`.
    DecimalsExceedLength {
        field: String,
        decimals: u32,
        length: u32,
    },
    /// A default value does not parse as the field's type.
    InvalidDefault { field: String, value: String },
    /// The field type does not take a default.
    DefaultNotAllowed { field: String, field_type: String },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTableName(s) => {
                write!(f, "invalid table name '{s}': must match [a-z][a-z0-9_]*")
            }
            Self::InvalidFieldName(s) => {
                write!(f, "invalid field name '{s}': must match [a-z][a-z0-9_]*")
            }
            Self::InvalidObjectName(s) => {
                write!(
                    f,
                    "invalid key or index name '{s}': must be non-empty without whitespace"
                )
            }
            Self::TableNameTooLong { name, max } => {
                write!(f, "table name '{name}' is longer than {max} characters")
            }
            Self::FieldNameTooLong { name, max } => {
                write!(f, "field name '{name}' is longer than {max} characters")
            }
            Self::EmptyPath => write!(f, "document PATH must not be empty"),
            Self::InvalidVersion(v) => {
                write!(f, "invalid document version '{v}': must be digits only")
            }
            Self::DuplicateTable(n) => write!(f, "duplicate table name '{n}'"),
            Self::EmptyTable(t) => write!(f, "table '{t}' declares no fields"),
            Self::MissingPrimaryKey(t) => write!(f, "table '{t}' declares no primary key"),
            Self::DuplicateField(n) => write!(f, "duplicate field name '{n}'"),
            Self::DuplicateKey(n) => write!(f, "duplicate key name '{n}'"),
            Self::DuplicateIndex(n) => write!(f, "duplicate index name '{n}'"),
            Self::EmptyKeyFields(k) => write!(f, "key '{k}' lists no fields"),
            Self::EmptyIndexFields(i) => write!(f, "index '{i}' lists no fields"),
            Self::InvalidHint { index, hint } => {
                write!(
                    f,
                    "index '{index}' has invalid hint '{hint}': must be non-empty, without commas or surrounding whitespace"
                )
            }
            Self::UnknownKeyField { key, field } => {
                write!(f, "key '{key}' references unknown field '{field}'")
            }
            Self::UnknownIndexField { index, field } => {
                write!(f, "index '{index}' references unknown field '{field}'")
            }
            Self::MultiplePrimaryKeys(k) => {
                write!(f, "key '{k}' is a second primary key in the same table")
            }
            Self::MissingReference(k) => {
                write!(f, "foreign key '{k}' needs REFTABLE and REFFIELDS")
            }
            Self::UnexpectedReference(k) => {
                write!(f, "key '{k}' is not foreign and must not carry a reference")
            }
            Self::ReferenceArity {
                key,
                fields,
                reffields,
            } => {
                write!(
                    f,
                    "foreign key '{key}' lists {fields} fields but {reffields} reference fields"
                )
            }
            Self::UnknownReferencedField { key, table, field } => {
                write!(
                    f,
                    "foreign key '{key}' references unknown field '{table}.{field}'"
                )
            }
            Self::MultipleSequences(n) => {
                write!(f, "field '{n}' is a second sequence field in the same table")
            }
            Self::SequenceNotInteger(n) => {
                write!(f, "sequence field '{n}' must be of type int")
            }
            Self::SequenceWithDefault(n) => {
                write!(f, "sequence field '{n}' must not declare a default")
            }
            Self::MissingLength { field, field_type } => {
                write!(f, "field '{field}' of type {field_type} requires a LENGTH")
            }
            Self::UnexpectedLength { field, field_type } => {
                write!(f, "field '{field}' of type {field_type} does not take a LENGTH")
            }
            Self::LengthOutOfRange { field, length, max } => {
                write!(f, "field '{field}' has LENGTH {length}, allowed range is 1..={max}")
            }
            Self::UnexpectedDecimals { field, field_type } => {
                write!(f, "field '{field}' of type {field_type} does not take DECIMALS")
            }
            Self::DecimalsExceedLength {
                field,
                decimals,
                length,
            } => {
                write!(
                    f,
                    "field '{field}' has DECIMALS {decimals} greater than LENGTH {length}"
                )
            }
            Self::InvalidDefault { field, value } => {
                write!(f, "field '{field}' has invalid default '{value}'")
            }
            Self::DefaultNotAllowed { field, field_type } => {
                write!(f, "field '{field}' of type {field_type} does not take a DEFAULT")
            }
        }
    }
}

impl std::error::Error for SchemaError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let cases = vec![
            (
                SchemaError::InvalidTableName("Foo".into()),
                "invalid table name 'Foo'",
            ),
            (
                SchemaError::DuplicateTable("user".into()),
                "duplicate table name 'user'",
            ),
            (
                SchemaError::UnknownKeyField {
                    key: "primary".into(),
                    field: "idx".into(),
                },
                "key 'primary' references unknown field 'idx'",
            ),
            (
                SchemaError::ReferenceArity {
                    key: "course".into(),
                    fields: 2,
                    reffields: 1,
                },
                "foreign key 'course' lists 2 fields",
            ),
            (
                SchemaError::LengthOutOfRange {
                    field: "name".into(),
                    length: 2000,
                    max: 1333,
                },
                "field 'name' has LENGTH 2000",
            ),
            (SchemaError::EmptyPath, "document PATH must not be empty"),
        ];

        for (error, expected_prefix) in cases {
            let msg = error.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error display for {error:?} = '{msg}', expected to start with '{expected_prefix}'"
            );
        }
    }

    #[test]
    fn error_is_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(SchemaError::DuplicateField("id".into()));
        assert!(err.to_string().contains("duplicate field name"));
    }
}
