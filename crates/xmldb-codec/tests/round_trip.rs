use xmldb_codec::{parse, serialize, verify, Codec, CodecError, Malformed, Verdict, Violation};
use xmldb_core::types::{
    FieldDefinition, FieldName, FieldType, KeyDefinition, KeyKind, ObjectName, SchemaDocument,
    TableDefinition, TableName,
};
use xmldb_core::{Limits, SchemaError};

const FORUM: &str = include_str!("fixtures/forum_install.xml");
const BLOCK: &str = include_str!("fixtures/block_install.xml");
const EMPTY: &str = include_str!("fixtures/empty_install.xml");

/// Helper: parse, serialize, and require byte-identical output.
fn assert_canonical(source: &str) {
    let document = parse(source).unwrap_or_else(|e| panic!("parse failed: {e}"));
    let printed = serialize(&document);
    assert_eq!(printed, source, "serialized text differs from the fixture");
    assert_eq!(verify(source).unwrap(), Verdict::Canonical);
}

#[test]
fn forum_fixture_is_canonical() {
    assert_canonical(FORUM);
}

#[test]
fn block_fixture_is_canonical() {
    assert_canonical(BLOCK);
}

#[test]
fn empty_fixture_is_canonical() {
    assert_canonical(EMPTY);
}

#[test]
fn forum_model_contents() {
    let document = parse(FORUM).unwrap();
    assert_eq!(document.path, "mod/forum/db");
    assert_eq!(document.version, "20240415");
    assert_eq!(document.tables.len(), 3);

    let grades = document.table("forum_grades").unwrap();
    let key = grades
        .keys
        .iter()
        .find(|k| k.kind == KeyKind::ForeignUnique)
        .unwrap();
    assert_eq!(key.fields.len(), 3);
    assert_eq!(key.reference.as_ref().unwrap().table.as_str(), "forum_discussions");

    let feedback = grades.field("feedback").unwrap();
    assert_eq!(
        feedback.comment.as_deref(),
        Some(r#"Teacher & marker "notes""#)
    );
    assert_eq!(grades.indexes[0].hints, vec!["varchar_pattern_ops".to_string()]);
}

#[test]
fn table_order_is_preserved() {
    let table = |name: &str| {
        format!(
            r#"    <TABLE NAME="{name}">
      <FIELDS>
        <FIELD NAME="id" TYPE="int" LENGTH="10" NOTNULL="true" SEQUENCE="true"/>
      </FIELDS>
      <KEYS>
        <KEY NAME="primary" TYPE="primary" FIELDS="id"/>
      </KEYS>
    </TABLE>
"#
        )
    };
    let source = format!(
        r#"<?xml version="1.0" encoding="UTF-8" ?>
<XMLDB PATH="local/order/db" VERSION="1"
    xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
    xsi:noNamespaceSchemaLocation="../../../lib/xmldb/xmldb.xsd"
>
  <TABLES>
{}{}{}  </TABLES>
</XMLDB>
"#,
        table("b"),
        table("a"),
        table("c")
    );

    let document = parse(&source).unwrap();
    let names: Vec<_> = document.tables.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["b", "a", "c"]);
    assert_eq!(serialize(&document), source);
}

#[test]
fn field_order_is_preserved() {
    let source = r#"<?xml version="1.0" encoding="UTF-8" ?>
<XMLDB PATH="local/order/db" VERSION="1"
    xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
    xsi:noNamespaceSchemaLocation="../../../lib/xmldb/xmldb.xsd"
>
  <TABLES>
    <TABLE NAME="order_fields">
      <FIELDS>
        <FIELD NAME="b" TYPE="int" LENGTH="10" NOTNULL="true" SEQUENCE="true"/>
        <FIELD NAME="a" TYPE="char" LENGTH="20" NOTNULL="false" SEQUENCE="false"/>
        <FIELD NAME="c" TYPE="text" NOTNULL="false" SEQUENCE="false"/>
      </FIELDS>
      <KEYS>
        <KEY NAME="primary" TYPE="primary" FIELDS="b"/>
      </KEYS>
    </TABLE>
  </TABLES>
</XMLDB>
"#;

    let document = parse(source).unwrap();
    let names: Vec<_> = document.tables[0]
        .fields
        .iter()
        .map(|f| f.name.as_str())
        .collect();
    assert_eq!(names, vec!["b", "a", "c"]);
    assert_eq!(serialize(&document), source);
}

#[test]
fn raised_name_limits_round_trip_through_matching_codec() {
    let long = "a".repeat(40);
    let limits = Limits {
        table_name_max: 40,
        ..Limits::default()
    };
    let id = FieldName::new("id").unwrap();
    let fields = || {
        vec![FieldDefinition::new(id.clone(), FieldType::Integer)
            .with_length(10)
            .not_null()
            .sequence()]
    };
    let keys = || {
        vec![KeyDefinition::new(
            ObjectName::new("primary").unwrap(),
            KeyKind::Primary,
            vec![id.clone()],
        )]
    };
    let name = TableName::new(long.as_str()).unwrap();

    // Default limits reject the name before it can be printed.
    assert!(matches!(
        TableDefinition::new(name.clone(), None, fields(), keys(), vec![]),
        Err(SchemaError::TableNameTooLong { max: 28, .. })
    ));

    let table =
        TableDefinition::new_with_limits(name, None, fields(), keys(), vec![], &limits).unwrap();
    let document = SchemaDocument::new("local/long/db", "1", None, vec![table]).unwrap();
    let codec = Codec::new(limits);
    let text = codec.serialize(&document);
    assert_eq!(codec.parse(&text).unwrap(), document);
    assert!(parse(&text).is_err());
}

#[test]
fn loose_formatting_normalizes_idempotently() {
    let loose = r#"<XMLDB VERSION="1" PATH="local/x/db">
<TABLES><TABLE NAME="x"><FIELDS>
  <FIELD SEQUENCE="true" NOTNULL="true" LENGTH="10" TYPE="int" NAME="id" />
  <FIELD NAME='label' TYPE='char' LENGTH='20' NOTNULL='false' SEQUENCE='false' DEFAULT='a&apos;b'/>
</FIELDS><KEYS><KEY NAME="primary" TYPE="primary" FIELDS="id"></KEY></KEYS>
<INDEXES><INDEX NAME="label" UNIQUE="true" FIELDS="label,id"/></INDEXES></TABLE></TABLES></XMLDB>"#;

    let first = serialize(&parse(loose).unwrap());
    assert!(matches!(verify(loose).unwrap(), Verdict::Mismatch(_)));
    assert!(first.contains(r#"DEFAULT="a'b""#));
    assert!(first.contains(r#"FIELDS="label, id""#));

    let second = serialize(&parse(&first).unwrap());
    assert_eq!(first, second);
    assert_eq!(verify(&first).unwrap(), Verdict::Canonical);
}

#[test]
fn unclosed_element_is_malformed() {
    let source = FORUM.replacen("      </FIELDS>\n", "", 1);
    let err = parse(&source).unwrap_err();
    assert!(
        matches!(
            &err,
            CodecError::MalformedInput {
                problem: Malformed::MismatchedClosingTag { .. },
                ..
            }
        ),
        "{err:?}"
    );
}

#[test]
fn dangling_key_field_is_invalid_structure() {
    let source = FORUM.replace(
        r#"<KEY NAME="forum" TYPE="foreign" FIELDS="forum" REFTABLE="forum" REFFIELDS="id"/>"#,
        r#"<KEY NAME="forum" TYPE="foreign" FIELDS="forumid" REFTABLE="forum" REFFIELDS="id"/>"#,
    );
    let err = parse(&source).unwrap_err();
    match &err {
        CodecError::InvalidStructure {
            violation: Violation::Schema(SchemaError::UnknownKeyField { key, field }),
            span,
        } => {
            assert_eq!(key, "forum");
            assert_eq!(field, "forumid");
            assert!(source[span.start..].starts_with(r#"<KEY NAME="forum""#));
            let (line, _) = span.line_col(&source);
            assert_eq!(line, 38);
        }
        other => panic!("expected unknown key field, got {other:?}"),
    }
}

#[test]
fn dangling_reference_in_same_document_is_invalid() {
    let source = FORUM.replace(
        r#"REFTABLE="forum" REFFIELDS="id"/>"#,
        r#"REFTABLE="forum" REFFIELDS="uid"/>"#,
    );
    let err = parse(&source).unwrap_err();
    assert!(matches!(
        err,
        CodecError::InvalidStructure {
            violation: Violation::Schema(SchemaError::UnknownReferencedField { .. }),
            ..
        }
    ));
}

#[test]
fn second_sequence_is_invalid() {
    let source = BLOCK.replace(
        r#"<FIELD NAME="userid" TYPE="int" LENGTH="10" NOTNULL="true" SEQUENCE="false"/>"#,
        r#"<FIELD NAME="userid" TYPE="int" LENGTH="10" NOTNULL="true" SEQUENCE="true"/>"#,
    );
    let err = parse(&source).unwrap_err();
    assert!(matches!(
        err,
        CodecError::InvalidStructure {
            violation: Violation::Schema(SchemaError::MultipleSequences(_)),
            ..
        }
    ));
}

#[test]
fn decimals_on_int_is_invalid() {
    let source = BLOCK.replace(
        r#"LENGTH="4" NOTNULL="true" DEFAULT="-1" SEQUENCE="false"/>"#,
        r#"LENGTH="4" NOTNULL="true" DEFAULT="-1" SEQUENCE="false" DECIMALS="2"/>"#,
    );
    let err = parse(&source).unwrap_err();
    assert!(matches!(
        err,
        CodecError::InvalidStructure {
            violation: Violation::Schema(SchemaError::UnexpectedDecimals { .. }),
            ..
        }
    ));
}

#[test]
fn text_without_declaration_still_parses() {
    let source = EMPTY.replacen("<?xml version=\"1.0\" encoding=\"UTF-8\" ?>\n", "", 1);
    let document = parse(&source).unwrap();
    assert_eq!(serialize(&document), EMPTY);
    match verify(&source).unwrap() {
        Verdict::Mismatch(m) => assert_eq!(m.line, 1),
        Verdict::Canonical => panic!("missing declaration must not be canonical"),
    }
}
