use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

use super::field_name::FieldName;
use super::object_name::ObjectName;
use super::table_name::TableName;

/// Kind of a `<KEY>` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeyKind {
    Primary,
    Unique,
    Foreign,
    ForeignUnique,
}

impl KeyKind {
    pub const ALL: [KeyKind; 4] = [
        Self::Primary,
        Self::Unique,
        Self::Foreign,
        Self::ForeignUnique,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Unique => "unique",
            Self::Foreign => "foreign",
            Self::ForeignUnique => "foreign-unique",
        }
    }

    pub fn from_attr(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == s)
    }

    /// Foreign kinds must carry a [`ForeignReference`]; others must not.
    pub fn is_foreign(self) -> bool {
        matches!(self, Self::Foreign | Self::ForeignUnique)
    }
}

impl std::fmt::Display for KeyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target of a foreign key: `REFTABLE` and `REFFIELDS`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignReference {
    pub table: TableName,
    pub fields: Vec<FieldName>,
}

/// A `<KEY>` element of a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyDefinition {
    pub name: ObjectName,
    pub kind: KeyKind,
    pub fields: Vec<FieldName>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<ForeignReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl KeyDefinition {
    pub fn new(name: ObjectName, kind: KeyKind, fields: Vec<FieldName>) -> Self {
        Self {
            name,
            kind,
            fields,
            reference: None,
            comment: None,
        }
    }

    pub fn with_reference(mut self, table: TableName, fields: Vec<FieldName>) -> Self {
        self.reference = Some(ForeignReference { table, fields });
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Checks the rules that do not depend on the owning table.
    pub fn validate(&self) -> Result<(), SchemaError> {
        let key = self.name.to_string();
        if self.fields.is_empty() {
            return Err(SchemaError::EmptyKeyFields(key));
        }
        match (&self.reference, self.kind.is_foreign()) {
            (None, true) => Err(SchemaError::MissingReference(key)),
            (Some(_), false) => Err(SchemaError::UnexpectedReference(key)),
            (Some(reference), true) if reference.fields.len() != self.fields.len() => {
                Err(SchemaError::ReferenceArity {
                    key,
                    fields: self.fields.len(),
                    reffields: reference.fields.len(),
                })
            }
            _ => Ok(()),
        }
    }
}
