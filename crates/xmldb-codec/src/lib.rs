//! # xmldb-codec
//!
//! Parser and canonical serializer for `install.xml` schema-description
//! documents.
//!
//! This crate provides:
//! - A lexer for the XML subset these documents use
//! - A recursive descent parser producing an element tree
//! - A declarative grammar that the element tree is checked against
//! - A model builder producing validated `SchemaDocument` values
//! - A printer emitting the canonical text form
//! - Round-trip verification and per-file batch checking
//!
//! # Example
//!
//! ```
//! use xmldb_codec::{parse, serialize};
//!
//! let source = r#"<?xml version="1.0" encoding="UTF-8" ?>
//! <XMLDB PATH="local/notes/db" VERSION="2024050100"
//!     xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
//!     xsi:noNamespaceSchemaLocation="../../../lib/xmldb/xmldb.xsd"
//! >
//!   <TABLES>
//!     <TABLE NAME="local_notes">
//!       <FIELDS>
//!         <FIELD NAME="id" TYPE="int" LENGTH="10" NOTNULL="true" SEQUENCE="true"/>
//!       </FIELDS>
//!       <KEYS>
//!         <KEY NAME="primary" TYPE="primary" FIELDS="id"/>
//!       </KEYS>
//!     </TABLE>
//!   </TABLES>
//! </XMLDB>
//! "#;
//!
//! let document = parse(source).expect("parse failed");
//! assert_eq!(document.tables[0].name.as_str(), "local_notes");
//! assert_eq!(serialize(&document), source);
//! ```

pub mod batch;
mod codec;
pub mod error;
pub mod grammar;
mod lexer;
pub mod parser;
pub mod printer;
mod structure;
pub mod token;
pub mod verify;

pub use batch::{rewrite, BatchSummary, FileReport, MissingPolicy, Outcome};
pub use codec::Codec;
pub use error::{CodecError, Malformed, Span, Violation};
pub use verify::{Mismatch, Verdict};

use xmldb_core::types::SchemaDocument;

/// Parses a document with the default limits.
///
/// # Errors
///
/// Returns `MalformedInput` or `InvalidStructure` for the first problem.
pub fn parse(source: &str) -> Result<SchemaDocument, CodecError> {
    Codec::default().parse(source)
}

/// Serializes a document in canonical form.
pub fn serialize(document: &SchemaDocument) -> String {
    printer::print(document)
}

/// Checks well-formedness and the grammar only.
///
/// # Errors
///
/// Returns `MalformedInput` for the first problem.
pub fn validate_against_grammar(source: &str) -> Result<(), CodecError> {
    Codec::default().validate_against_grammar(source)
}

/// Checks the grammar and every structural constraint.
///
/// # Errors
///
/// Returns `MalformedInput` or `InvalidStructure` for the first problem.
pub fn validate_against_schema(source: &str) -> Result<(), CodecError> {
    Codec::default().validate_against_schema(source)
}

/// Parses with the default limits and compares with the canonical form.
///
/// # Errors
///
/// Returns the parse error when `source` is not a valid document.
pub fn verify(source: &str) -> Result<Verdict, CodecError> {
    Codec::default().verify(source)
}
