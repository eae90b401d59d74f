//! # xmldb-core
//!
//! In-memory model for XMLDB schema-description documents: tables and
//! their fields, keys and indexes. Every constructor enforces the
//! structural constraints of the format, so a value of these types is
//! always a valid document.

pub mod error;
pub mod limits;
pub mod types;

pub use error::SchemaError;
pub use limits::Limits;
