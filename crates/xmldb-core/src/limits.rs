use serde::{Deserialize, Serialize};

use crate::error::SchemaError;
use crate::types::{FieldName, TableName};

/// Name length limits applied while building a document.
///
/// Table names leave room for the installation prefix the database layer
/// prepends, which is why their default is shorter than the field limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    #[serde(default = "default_table_name_max")]
    pub table_name_max: usize,
    #[serde(default = "default_field_name_max")]
    pub field_name_max: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            table_name_max: default_table_name_max(),
            field_name_max: default_field_name_max(),
        }
    }
}

fn default_table_name_max() -> usize {
    28
}

fn default_field_name_max() -> usize {
    63
}

impl Limits {
    pub fn check_table_name(&self, name: &TableName) -> Result<(), SchemaError> {
        if name.as_str().len() > self.table_name_max {
            return Err(SchemaError::TableNameTooLong {
                name: name.to_string(),
                max: self.table_name_max,
            });
        }
        Ok(())
    }

    pub fn check_field_name(&self, name: &FieldName) -> Result<(), SchemaError> {
        if name.as_str().len() > self.field_name_max {
            return Err(SchemaError::FieldNameTooLong {
                name: name.to_string(),
                max: self.field_name_max,
            });
        }
        Ok(())
    }
}
