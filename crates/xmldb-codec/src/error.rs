use std::fmt;

use xmldb_core::SchemaError;

/// A byte-offset span in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    /// Inclusive start byte offset.
    pub start: usize,
    /// Exclusive end byte offset.
    pub end: usize,
}

impl Span {
    /// Creates a new span from start (inclusive) to end (exclusive).
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// 1-based line and column of the span start within `source`.
    ///
    /// Columns count characters, not bytes.
    pub fn line_col(&self, source: &str) -> (usize, usize) {
        let mut start = self.start.min(source.len());
        while !source.is_char_boundary(start) {
            start -= 1;
        }
        let before = &source[..start];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |pos| pos + 1);
        (line, before[line_start..].chars().count() + 1)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Ways a document can fail to be well-formed or fail the grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Malformed {
    /// The lexer met bytes that match no token rule.
    InvalidToken,
    /// The parser met a token it did not expect.
    UnexpectedToken { expected: String, found: String },
    /// Input ended while more was expected.
    UnexpectedEndOfInput { expected: String },
    /// A closing tag does not match the open element.
    MismatchedClosingTag { expected: String, found: String },
    /// An attribute appears twice on one element.
    DuplicateAttribute { element: String, attribute: String },
    /// An `&...;` reference is not one of the predefined or numeric entities.
    InvalidEntity { text: String },
    /// The root element is not the one the grammar declares.
    UnexpectedRoot { expected: String, found: String },
    /// An element is not allowed at this position.
    UnexpectedElement { parent: String, found: String },
    /// A required child element is absent.
    MissingElement { parent: String, expected: String },
    /// A required attribute is absent.
    MissingAttribute { element: String, attribute: String },
    /// An attribute is not declared for this element.
    UnknownAttribute { element: String, attribute: String },
    /// Elements are nested deeper than the parser accepts.
    NestingTooDeep { limit: usize },
}

impl fmt::Display for Malformed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidToken => write!(f, "invalid token"),
            Self::UnexpectedToken { expected, found } => {
                write!(f, "unexpected token: expected {expected}, found {found}")
            }
            Self::UnexpectedEndOfInput { expected } => {
                write!(f, "unexpected end of input: expected {expected}")
            }
            Self::MismatchedClosingTag { expected, found } => {
                write!(f, "closing tag </{found}> does not match open element <{expected}>")
            }
            Self::DuplicateAttribute { element, attribute } => {
                write!(f, "attribute {attribute} appears twice on <{element}>")
            }
            Self::InvalidEntity { text } => write!(f, "unknown entity reference '{text}'"),
            Self::UnexpectedRoot { expected, found } => {
                write!(f, "root element must be <{expected}>, found <{found}>")
            }
            Self::UnexpectedElement { parent, found } => {
                write!(f, "element <{found}> is not allowed here inside <{parent}>")
            }
            Self::MissingElement { parent, expected } => {
                write!(f, "<{parent}> is missing required element <{expected}>")
            }
            Self::MissingAttribute { element, attribute } => {
                write!(f, "<{element}> is missing required attribute {attribute}")
            }
            Self::UnknownAttribute { element, attribute } => {
                write!(f, "attribute {attribute} is not declared for <{element}>")
            }
            Self::NestingTooDeep { limit } => {
                write!(f, "elements are nested more than {limit} levels deep")
            }
        }
    }
}

/// Ways a well-formed document can violate the structural schema.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Violation {
    /// A boolean attribute is neither `true` nor `false`.
    InvalidBoolean { attribute: String, value: String },
    /// A numeric attribute is not a non-negative decimal integer.
    InvalidNumber { attribute: String, value: String },
    /// `TYPE` of a field names no known type.
    UnknownFieldType(String),
    /// `TYPE` of a key names no known kind.
    UnknownKeyType(String),
    /// A comma separated list has an empty entry.
    InvalidList { attribute: String, value: String },
    /// Only one of `REFTABLE` and `REFFIELDS` is present.
    IncompleteReference { key: String },
    /// A model constraint failed.
    Schema(SchemaError),
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBoolean { attribute, value } => {
                write!(f, "{attribute}=\"{value}\" must be true or false")
            }
            Self::InvalidNumber { attribute, value } => {
                write!(f, "{attribute}=\"{value}\" must be a non-negative integer")
            }
            Self::UnknownFieldType(t) => write!(
                f,
                "unknown field type '{t}': expected int, number, float, char, text or binary"
            ),
            Self::UnknownKeyType(t) => write!(
                f,
                "unknown key type '{t}': expected primary, unique, foreign or foreign-unique"
            ),
            Self::InvalidList { attribute, value } => {
                write!(f, "{attribute}=\"{value}\" contains an empty entry")
            }
            Self::IncompleteReference { key } => {
                write!(f, "key '{key}' must set both REFTABLE and REFFIELDS or neither")
            }
            Self::Schema(e) => write!(f, "{e}"),
        }
    }
}

impl From<SchemaError> for Violation {
    fn from(e: SchemaError) -> Self {
        Self::Schema(e)
    }
}

/// Errors produced while parsing a schema-description document.
///
/// Parsing is atomic: any error means no document was produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The input violates the grammar (nesting, tags, required attributes).
    MalformedInput { problem: Malformed, span: Span },
    /// The input is well-formed but violates a structural constraint.
    InvalidStructure { violation: Violation, span: Span },
}

impl CodecError {
    pub(crate) fn malformed(problem: Malformed, span: Span) -> Self {
        Self::MalformedInput { problem, span }
    }

    pub(crate) fn structure(violation: impl Into<Violation>, span: Span) -> Self {
        Self::InvalidStructure {
            violation: violation.into(),
            span,
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            Self::MalformedInput { span, .. } | Self::InvalidStructure { span, .. } => span,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedInput { .. })
    }

    pub fn is_invalid_structure(&self) -> bool {
        matches!(self, Self::InvalidStructure { .. })
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedInput { problem, span } => {
                write!(f, "malformed input at {span}: {problem}")
            }
            Self::InvalidStructure { violation, span } => {
                write!(f, "invalid structure at {span}: {violation}")
            }
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidStructure {
                violation: Violation::Schema(source),
                ..
            } => Some(source),
            _ => None,
        }
    }
}
