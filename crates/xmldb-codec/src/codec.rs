use tracing::debug;
use xmldb_core::types::SchemaDocument;
use xmldb_core::Limits;

use crate::error::CodecError;
use crate::grammar::{Grammar, XMLDB};
use crate::parser::{parse_markup, Element};
use crate::printer;
use crate::structure::ModelBuilder;
use crate::verify::{compare, Verdict};

/// Parser and serializer for `install.xml` documents.
///
/// Holds the configuration every operation shares: the element grammar and
/// the name length limits. `Codec::default()` uses the stock grammar and
/// limits.
#[derive(Debug, Clone, Copy)]
pub struct Codec {
    grammar: &'static Grammar,
    limits: Limits,
}

impl Default for Codec {
    fn default() -> Self {
        Self::new(Limits::default())
    }
}

impl Codec {
    pub fn new(limits: Limits) -> Self {
        Self {
            grammar: &XMLDB,
            limits,
        }
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Checks that `source` is well-formed and admitted by the grammar.
    ///
    /// # Errors
    ///
    /// Returns `MalformedInput` at the first problem found.
    pub fn validate_against_grammar(&self, source: &str) -> Result<(), CodecError> {
        self.grammar_checked(source).map(|_| ())
    }

    /// Checks the grammar and then every structural constraint.
    ///
    /// # Errors
    ///
    /// Returns `MalformedInput` for grammar problems and `InvalidStructure`
    /// for the first violated constraint.
    pub fn validate_against_schema(&self, source: &str) -> Result<(), CodecError> {
        self.parse(source).map(|_| ())
    }

    /// Parses `source` into a validated document.
    ///
    /// Parsing is atomic: on error nothing is returned.
    ///
    /// # Errors
    ///
    /// Returns `MalformedInput` or `InvalidStructure` describing the first
    /// problem, located by its byte span.
    pub fn parse(&self, source: &str) -> Result<SchemaDocument, CodecError> {
        let root = self.grammar_checked(source)?;
        let document = ModelBuilder::new(&self.limits).build(&root)?;
        debug!(
            path = %document.path,
            tables = document.tables.len(),
            "document parsed"
        );
        Ok(document)
    }

    /// Serializes `document` in canonical form.
    pub fn serialize(&self, document: &SchemaDocument) -> String {
        printer::print(document)
    }

    /// Parses `source` and compares it with its canonical form.
    ///
    /// # Errors
    ///
    /// Returns the parse error when `source` is not a valid document.
    pub fn verify(&self, source: &str) -> Result<Verdict, CodecError> {
        let document = self.parse(source)?;
        let verdict = compare(source, self.serialize(&document));
        debug!(canonical = verdict.is_canonical(), "document verified");
        Ok(verdict)
    }

    fn grammar_checked(&self, source: &str) -> Result<Element, CodecError> {
        let root = parse_markup(source)?;
        debug!(root = %root.name, "markup parsed");
        self.grammar.validate(&root)?;
        Ok(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"<?xml version="1.0" encoding="UTF-8" ?>
<XMLDB PATH="local/demo/db" VERSION="2024010100" COMMENT="Demo plugin"
    xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
    xsi:noNamespaceSchemaLocation="../../../lib/xmldb/xmldb.xsd"
>
  <TABLES>
    <TABLE NAME="local_demo" COMMENT="Demo records">
      <FIELDS>
        <FIELD NAME="id" TYPE="int" LENGTH="10" NOTNULL="true" SEQUENCE="true"/>
        <FIELD NAME="name" TYPE="char" LENGTH="255" NOTNULL="true" DEFAULT="" SEQUENCE="false"/>
      </FIELDS>
      <KEYS>
        <KEY NAME="primary" TYPE="primary" FIELDS="id"/>
      </KEYS>
    </TABLE>
  </TABLES>
</XMLDB>
"#;

    #[test]
    fn parse_then_serialize_is_identity() {
        let codec = Codec::default();
        let doc = codec.parse(SOURCE).unwrap();
        assert_eq!(codec.serialize(&doc), SOURCE);
        assert!(codec.verify(SOURCE).unwrap().is_canonical());
    }

    #[test]
    fn grammar_validation_skips_structure() {
        let source = SOURCE.replace(r#"TYPE="char""#, r#"TYPE="varchar""#);
        let codec = Codec::default();
        codec.validate_against_grammar(&source).unwrap();
        let err = codec.validate_against_schema(&source).unwrap_err();
        assert!(err.is_invalid_structure());
    }

    #[test]
    fn schema_validation_reports_grammar_errors_first() {
        let source = SOURCE.replace("</KEYS>", "");
        let err = Codec::default().validate_against_schema(&source).unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn verify_reports_non_canonical_spacing() {
        let source = SOURCE.replace("    <TABLE ", "  <TABLE ");
        match Codec::default().verify(&source).unwrap() {
            Verdict::Mismatch(m) => {
                assert_eq!(m.line, 7);
                assert_eq!(m.canonical, SOURCE);
            }
            Verdict::Canonical => panic!("expected mismatch"),
        }
    }

    #[test]
    fn limits_are_configurable() {
        let limits = Limits {
            table_name_max: 5,
            ..Limits::default()
        };
        let err = Codec::new(limits).parse(SOURCE).unwrap_err();
        assert!(err.is_invalid_structure());
        assert_eq!(Codec::new(limits).limits().table_name_max, 5);
    }
}
