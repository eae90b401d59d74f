use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

use super::default_value::DefaultValue;
use super::field_name::FieldName;
use super::field_type::FieldType;

/// A column of a table: one `<FIELD>` element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: FieldName,
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimals: Option<u32>,
    pub not_null: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultValue>,
    pub sequence: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl FieldDefinition {
    /// Creates a nullable field with no length, default or comment.
    pub fn new(name: FieldName, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            length: None,
            decimals: None,
            not_null: false,
            default: None,
            sequence: false,
            comment: None,
        }
    }

    pub fn with_length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    pub fn with_decimals(mut self, decimals: u32) -> Self {
        self.decimals = Some(decimals);
        self
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    pub fn with_default(mut self, default: DefaultValue) -> Self {
        self.default = Some(default);
        self
    }

    /// Marks the field as the table's auto-increment column.
    pub fn sequence(mut self) -> Self {
        self.sequence = true;
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Checks the per-field rules: length and decimals against the type,
    /// default against the type, and sequence restrictions.
    pub fn validate(&self) -> Result<(), SchemaError> {
        let field = self.name.to_string();
        let field_type = self.field_type;

        match (self.length, field_type.max_length()) {
            (None, _) if field_type.requires_length() => {
                return Err(SchemaError::MissingLength {
                    field,
                    field_type: field_type.to_string(),
                });
            }
            (Some(_), None) => {
                return Err(SchemaError::UnexpectedLength {
                    field,
                    field_type: field_type.to_string(),
                });
            }
            (Some(length), Some(max)) if length == 0 || length > max => {
                return Err(SchemaError::LengthOutOfRange { field, length, max });
            }
            _ => {}
        }

        if let Some(decimals) = self.decimals {
            if !field_type.allows_decimals() {
                return Err(SchemaError::UnexpectedDecimals {
                    field,
                    field_type: field_type.to_string(),
                });
            }
            if let Some(length) = self.length {
                if decimals > length {
                    return Err(SchemaError::DecimalsExceedLength {
                        field,
                        decimals,
                        length,
                    });
                }
            }
        }

        if self.sequence {
            if field_type != FieldType::Integer {
                return Err(SchemaError::SequenceNotInteger(field));
            }
            if self.default.is_some() {
                return Err(SchemaError::SequenceWithDefault(field));
            }
        }

        if let Some(default) = &self.default {
            if !field_type.allows_default() {
                return Err(SchemaError::DefaultNotAllowed {
                    field,
                    field_type: field_type.to_string(),
                });
            }
            if !default.fits(field_type) {
                return Err(SchemaError::InvalidDefault {
                    field,
                    value: default.to_string(),
                });
            }
        }

        Ok(())
    }
}

impl std::fmt::Display for FieldDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.name, self.field_type)?;
        if let Some(length) = self.length {
            write!(f, "({length}")?;
            if let Some(decimals) = self.decimals {
                write!(f, ",{decimals}")?;
            }
            write!(f, ")")?;
        }
        if self.not_null {
            write!(f, " not null")?;
        }
        if let Some(default) = &self.default {
            write!(f, " default '{default}'")?;
        }
        if self.sequence {
            write!(f, " sequence")?;
        }
        Ok(())
    }
}
