use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

use super::field_name::FieldName;
use super::object_name::ObjectName;

/// An `<INDEX>` element of a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDefinition {
    pub name: ObjectName,
    pub unique: bool,
    pub fields: Vec<FieldName>,
    /// Database-specific hints such as `varchar_pattern_ops`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl IndexDefinition {
    pub fn new(name: ObjectName, unique: bool, fields: Vec<FieldName>) -> Self {
        Self {
            name,
            unique,
            fields,
            hints: Vec::new(),
            comment: None,
        }
    }

    pub fn with_hints(mut self, hints: Vec<String>) -> Self {
        self.hints = hints;
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.fields.is_empty() {
            return Err(SchemaError::EmptyIndexFields(self.name.to_string()));
        }
        // Hints are written as one comma-separated attribute.
        if let Some(hint) = self
            .hints
            .iter()
            .find(|h| h.is_empty() || h.contains(',') || h.trim() != h.as_str())
        {
            return Err(SchemaError::InvalidHint {
                index: self.name.to_string(),
                hint: hint.clone(),
            });
        }
        Ok(())
    }
}
