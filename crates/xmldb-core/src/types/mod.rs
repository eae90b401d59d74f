mod default_value;
mod field_definition;
mod field_name;
mod field_type;
mod index_definition;
mod key_definition;
mod object_name;
mod schema_document;
mod table_definition;
mod table_name;

pub use default_value::DefaultValue;
pub use field_definition::FieldDefinition;
pub use field_name::FieldName;
pub use field_type::FieldType;
pub use index_definition::IndexDefinition;
pub use key_definition::{ForeignReference, KeyDefinition, KeyKind};
pub use object_name::ObjectName;
pub use schema_document::SchemaDocument;
pub use table_definition::TableDefinition;
pub use table_name::TableName;
