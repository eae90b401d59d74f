use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

use super::field_name::is_lower_identifier;

/// A validated table name matching `[a-z][a-z0-9_]*`.
///
/// Length is not checked here; see [`crate::Limits`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TableName(String);

impl TableName {
    /// Creates a new `TableName`, validating the identifier format.
    pub fn new(s: impl Into<String>) -> Result<Self, SchemaError> {
        let s = s.into();
        if !is_lower_identifier(&s) {
            return Err(SchemaError::InvalidTableName(s));
        }
        Ok(Self(s))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<TableName> for String {
    fn from(n: TableName) -> String {
        n.0
    }
}

impl TryFrom<String> for TableName {
    type Error = SchemaError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl AsRef<str> for TableName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
