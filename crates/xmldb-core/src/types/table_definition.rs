use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;
use crate::limits::Limits;

use super::field_definition::FieldDefinition;
use super::index_definition::IndexDefinition;
use super::key_definition::{KeyDefinition, KeyKind};
use super::table_name::TableName;

/// A `<TABLE>` element: fields, keys and indexes in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDefinition {
    pub name: TableName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub fields: Vec<FieldDefinition>,
    pub keys: Vec<KeyDefinition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub indexes: Vec<IndexDefinition>,
}

impl TableDefinition {
    /// Creates a new `TableDefinition`, validating:
    /// - at least one field, every field valid, no duplicate field names
    /// - at most one sequence field
    /// - exactly one primary key, no duplicate key names
    /// - key and index fields exist in this table
    /// - no duplicate index names
    /// - table and field names within the default [`Limits`]
    pub fn new(
        name: TableName,
        comment: Option<String>,
        fields: Vec<FieldDefinition>,
        keys: Vec<KeyDefinition>,
        indexes: Vec<IndexDefinition>,
    ) -> Result<Self, SchemaError> {
        Self::new_with_limits(name, comment, fields, keys, indexes, &Limits::default())
    }

    /// Like [`TableDefinition::new`], with name lengths checked against `limits`.
    pub fn new_with_limits(
        name: TableName,
        comment: Option<String>,
        fields: Vec<FieldDefinition>,
        keys: Vec<KeyDefinition>,
        indexes: Vec<IndexDefinition>,
        limits: &Limits,
    ) -> Result<Self, SchemaError> {
        limits.check_table_name(&name)?;
        if fields.is_empty() {
            return Err(SchemaError::EmptyTable(name.to_string()));
        }

        let mut field_names = HashSet::with_capacity(fields.len());
        let mut has_sequence = false;
        for f in &fields {
            f.validate()?;
            limits.check_field_name(&f.name)?;
            if !field_names.insert(f.name.as_str()) {
                return Err(SchemaError::DuplicateField(f.name.to_string()));
            }
            if f.sequence {
                if has_sequence {
                    return Err(SchemaError::MultipleSequences(f.name.to_string()));
                }
                has_sequence = true;
            }
        }

        let mut key_names = HashSet::with_capacity(keys.len());
        let mut has_primary = false;
        for k in &keys {
            k.validate()?;
            if !key_names.insert(k.name.as_str()) {
                return Err(SchemaError::DuplicateKey(k.name.to_string()));
            }
            if k.kind == KeyKind::Primary {
                if has_primary {
                    return Err(SchemaError::MultiplePrimaryKeys(k.name.to_string()));
                }
                has_primary = true;
            }
            if let Some(missing) = k.fields.iter().find(|f| !field_names.contains(f.as_str())) {
                return Err(SchemaError::UnknownKeyField {
                    key: k.name.to_string(),
                    field: missing.to_string(),
                });
            }
        }
        if !has_primary {
            return Err(SchemaError::MissingPrimaryKey(name.to_string()));
        }

        let mut index_names = HashSet::with_capacity(indexes.len());
        for i in &indexes {
            i.validate()?;
            if !index_names.insert(i.name.as_str()) {
                return Err(SchemaError::DuplicateIndex(i.name.to_string()));
            }
            if let Some(missing) = i.fields.iter().find(|f| !field_names.contains(f.as_str())) {
                return Err(SchemaError::UnknownIndexField {
                    index: i.name.to_string(),
                    field: missing.to_string(),
                });
            }
        }

        Ok(Self {
            name,
            comment,
            fields,
            keys,
            indexes,
        })
    }

    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name.as_str() == name)
    }

    /// Returns the primary key.
    pub fn primary_key(&self) -> Option<&KeyDefinition> {
        self.keys.iter().find(|k| k.kind == KeyKind::Primary)
    }
}

impl std::fmt::Display for TableDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "table {} {{", self.name)?;
        for field in &self.fields {
            writeln!(f, "  {field}")?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::field_name::FieldName;
    use crate::types::field_type::FieldType;
    use crate::types::object_name::ObjectName;

    fn id_field() -> FieldDefinition {
        FieldDefinition::new(FieldName::new("id").unwrap(), FieldType::Integer)
            .with_length(10)
            .not_null()
            .sequence()
    }

    fn int_field(name: &str) -> FieldDefinition {
        FieldDefinition::new(FieldName::new(name).unwrap(), FieldType::Integer).with_length(10)
    }

    fn key(name: &str, kind: KeyKind, fields: &[&str]) -> KeyDefinition {
        KeyDefinition::new(
            ObjectName::new(name).unwrap(),
            kind,
            fields.iter().map(|f| FieldName::new(*f).unwrap()).collect(),
        )
    }

    fn primary() -> KeyDefinition {
        key("primary", KeyKind::Primary, &["id"])
    }

    fn table(
        fields: Vec<FieldDefinition>,
        keys: Vec<KeyDefinition>,
        indexes: Vec<IndexDefinition>,
    ) -> Result<TableDefinition, SchemaError> {
        TableDefinition::new(TableName::new("forum").unwrap(), None, fields, keys, indexes)
    }

    #[test]
    fn default_limits_apply_to_names() {
        let long_table = TableName::new("a".repeat(29)).unwrap();
        let result = TableDefinition::new(long_table.clone(), None, vec![id_field()], vec![primary()], vec![]);
        assert!(matches!(result, Err(SchemaError::TableNameTooLong { max: 28, .. })));

        let limits = Limits {
            table_name_max: 40,
            ..Limits::default()
        };
        assert!(TableDefinition::new_with_limits(
            long_table,
            None,
            vec![id_field()],
            vec![primary()],
            vec![],
            &limits
        )
        .is_ok());
    }

    #[test]
    fn field_name_limit_applies() {
        let limits = Limits {
            field_name_max: 1,
            ..Limits::default()
        };
        let result = TableDefinition::new_with_limits(
            TableName::new("t").unwrap(),
            None,
            vec![id_field()],
            vec![primary()],
            vec![],
            &limits,
        );
        assert!(matches!(result, Err(SchemaError::FieldNameTooLong { max: 1, .. })));
    }

    #[test]
    fn valid_table() {
        let t = table(vec![id_field(), int_field("course")], vec![primary()], vec![]).unwrap();
        assert_eq!(t.fields.len(), 2);
        assert!(t.field("course").is_some());
        assert!(t.field("missing").is_none());
        assert_eq!(t.primary_key().unwrap().name.as_str(), "primary");
    }

    #[test]
    fn empty_table() {
        assert!(matches!(
            table(vec![], vec![primary()], vec![]),
            Err(SchemaError::EmptyTable(_))
        ));
    }

    #[test]
    fn duplicate_fields() {
        assert!(matches!(
            table(vec![id_field(), int_field("id")], vec![primary()], vec![]),
            Err(SchemaError::DuplicateField(_))
        ));
    }

    #[test]
    fn two_sequences() {
        let second = FieldDefinition::new(FieldName::new("other").unwrap(), FieldType::Integer)
            .with_length(10)
            .sequence();
        assert!(matches!(
            table(vec![id_field(), second], vec![primary()], vec![]),
            Err(SchemaError::MultipleSequences(_))
        ));
    }

    #[test]
    fn key_references_unknown_field() {
        let result = table(
            vec![id_field()],
            vec![primary(), key("course", KeyKind::Unique, &["course"])],
            vec![],
        );
        assert!(matches!(
            result,
            Err(SchemaError::UnknownKeyField { ref field, .. }) if field == "course"
        ));
    }

    #[test]
    fn missing_primary_key() {
        assert!(matches!(
            table(vec![id_field()], vec![key("u", KeyKind::Unique, &["id"])], vec![]),
            Err(SchemaError::MissingPrimaryKey(_))
        ));
    }

    #[test]
    fn two_primary_keys() {
        let result = table(
            vec![id_field()],
            vec![primary(), key("again", KeyKind::Primary, &["id"])],
            vec![],
        );
        assert!(matches!(result, Err(SchemaError::MultiplePrimaryKeys(_))));
    }

    #[test]
    fn index_references_unknown_field() {
        let idx = IndexDefinition::new(
            ObjectName::new("name").unwrap(),
            false,
            vec![FieldName::new("name").unwrap()],
        );
        assert!(matches!(
            table(vec![id_field()], vec![primary()], vec![idx]),
            Err(SchemaError::UnknownIndexField { .. })
        ));
    }

    #[test]
    fn duplicate_index_names() {
        let idx = || {
            IndexDefinition::new(
                ObjectName::new("course").unwrap(),
                false,
                vec![FieldName::new("course").unwrap()],
            )
        };
        assert!(matches!(
            table(
                vec![id_field(), int_field("course")],
                vec![primary()],
                vec![idx(), idx()]
            ),
            Err(SchemaError::DuplicateIndex(_))
        ));
    }

    #[test]
    fn field_order_is_preserved() {
        let t = table(
            vec![int_field("b"), id_field(), int_field("c")],
            vec![primary()],
            vec![],
        )
        .unwrap();
        let names: Vec<&str> = t.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["b", "id", "c"]);
    }

    #[test]
    fn serde_roundtrip() {
        let t = table(vec![id_field()], vec![primary()], vec![]).unwrap();
        let json = serde_json::to_string(&t).unwrap();
        let back: TableDefinition = serde_json::from_str(&json).unwrap();
        assert_eq!(t, back);
    }
}
