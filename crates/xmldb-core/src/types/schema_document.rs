use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

use super::table_definition::TableDefinition;

/// A complete `install.xml` document: header attributes and tables.
///
/// Table order is significant; it is the order of the canonical output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDocument {
    /// Component directory relative to the installation root, e.g. `mod/forum/db`.
    pub path: String,
    /// Date-based version stamp, e.g. `20240115`.
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tables: Vec<TableDefinition>,
}

impl SchemaDocument {
    /// Creates a new `SchemaDocument`, validating:
    /// - path is non-empty and version is a run of digits
    /// - no duplicate table names
    /// - foreign keys into tables of this document name existing fields
    pub fn new(
        path: impl Into<String>,
        version: impl Into<String>,
        comment: Option<String>,
        tables: Vec<TableDefinition>,
    ) -> Result<Self, SchemaError> {
        let path = path.into();
        let version = version.into();

        if path.is_empty() {
            return Err(SchemaError::EmptyPath);
        }
        if version.is_empty() || !version.bytes().all(|b| b.is_ascii_digit()) {
            return Err(SchemaError::InvalidVersion(version));
        }

        let mut by_name: HashMap<&str, &TableDefinition> = HashMap::with_capacity(tables.len());
        for t in &tables {
            if by_name.insert(t.name.as_str(), t).is_some() {
                return Err(SchemaError::DuplicateTable(t.name.to_string()));
            }
        }

        for t in &tables {
            for k in &t.keys {
                let Some(reference) = &k.reference else {
                    continue;
                };
                // Tables owned by other components are checked by their own file.
                let Some(target) = by_name.get(reference.table.as_str()) else {
                    tracing::trace!(key = %k.name, table = %reference.table, "reference outside document");
                    continue;
                };
                let known: HashSet<&str> = target.fields.iter().map(|f| f.name.as_str()).collect();
                if let Some(missing) = reference.fields.iter().find(|f| !known.contains(f.as_str())) {
                    return Err(SchemaError::UnknownReferencedField {
                        key: k.name.to_string(),
                        table: reference.table.to_string(),
                        field: missing.to_string(),
                    });
                }
            }
        }

        Ok(Self {
            path,
            version,
            comment,
            tables,
        })
    }

    /// Looks up a table by name.
    pub fn table(&self, name: &str) -> Option<&TableDefinition> {
        self.tables.iter().find(|t| t.name.as_str() == name)
    }
}
