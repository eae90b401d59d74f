use std::collections::HashSet;

use crate::error::{CodecError, Malformed, Span};
use crate::lexer::SpannedToken;
use crate::token::Token;

/// An attribute with its decoded value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
    /// Covers `NAME="value"`.
    pub span: Span,
}

/// A generic element node: name, attributes in source order, child elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Element>,
    /// Covers the start tag.
    pub span: Span,
}

impl Element {
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.attribute(name).map(|a| a.value.as_str())
    }

    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }
}

/// Deepest element nesting accepted; the grammar itself needs five levels.
pub const MAX_DEPTH: usize = 32;

/// Recursive descent parser producing the element tree of a document.
///
/// Checks well-formedness only: balanced tags, quoted attributes, unique
/// attribute names and valid entity references.
struct Parser {
    tokens: Vec<SpannedToken>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<SpannedToken>) -> Self {
        Self { tokens, pos: 0 }
    }

    // -- Cursor helpers --

    fn peek(&self) -> Option<&SpannedToken> {
        self.tokens.get(self.pos)
    }

    fn peek_token(&self) -> Option<&Token> {
        self.peek().map(|st| &st.token)
    }

    fn advance(&mut self) -> Option<SpannedToken> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn expect(&mut self, expected: &Token) -> Result<SpannedToken, CodecError> {
        match self.advance() {
            Some(st) if st.token == *expected => Ok(st),
            Some(st) => Err(unexpected(expected.description(), &st)),
            None => Err(self.end_of_input(expected.description())),
        }
    }

    fn end_span(&self) -> Span {
        self.tokens
            .last()
            .map(|st| Span::new(st.span.end, st.span.end))
            .unwrap_or(Span::new(0, 0))
    }

    fn end_of_input(&self, expected: &str) -> CodecError {
        CodecError::malformed(
            Malformed::UnexpectedEndOfInput {
                expected: expected.to_string(),
            },
            self.end_span(),
        )
    }

    // -- Grammar productions --

    /// document = declaration? element
    fn parse_document(&mut self) -> Result<Element, CodecError> {
        if self.peek_token() == Some(&Token::Declaration) {
            self.advance();
        }
        let root = self.parse_element(1)?;
        if let Some(st) = self.peek() {
            return Err(unexpected("end of input", st));
        }
        Ok(root)
    }

    /// element = '<' NAME attribute* ('/>' | '>' element* '</' NAME '>')
    fn parse_element(&mut self, depth: usize) -> Result<Element, CodecError> {
        let open = self.expect(&Token::StartTagOpen)?;
        if depth > MAX_DEPTH {
            return Err(CodecError::malformed(
                Malformed::NestingTooDeep { limit: MAX_DEPTH },
                open.span,
            ));
        }
        let name = open.text[1..].to_string();

        let mut attributes = Vec::new();
        let mut seen = HashSet::new();
        while self.peek_token() == Some(&Token::Name) {
            let attribute = self.parse_attribute()?;
            if !seen.insert(attribute.name.clone()) {
                return Err(CodecError::malformed(
                    Malformed::DuplicateAttribute {
                        element: name,
                        attribute: attribute.name,
                    },
                    attribute.span,
                ));
            }
            attributes.push(attribute);
        }

        let close = match self.advance() {
            Some(st) if matches!(st.token, Token::TagClose | Token::EmptyTagClose) => st,
            Some(st) => return Err(unexpected("'>' or '/>'", &st)),
            None => return Err(self.end_of_input("'>' or '/>'")),
        };
        let span = Span::new(open.span.start, close.span.end);

        let mut children = Vec::new();
        if close.token == Token::TagClose {
            loop {
                match self.peek_token() {
                    Some(Token::StartTagOpen) => children.push(self.parse_element(depth + 1)?),
                    Some(Token::EndTagOpen) => break,
                    Some(_) => {
                        return Err(unexpected(
                            "child element or end tag",
                            &self.tokens[self.pos],
                        ))
                    }
                    None => return Err(self.end_of_input(&format!("</{name}>"))),
                }
            }
            let end = self.expect(&Token::EndTagOpen)?;
            let found = &end.text[2..];
            if found != name {
                return Err(CodecError::malformed(
                    Malformed::MismatchedClosingTag {
                        expected: name,
                        found: found.to_string(),
                    },
                    end.span,
                ));
            }
            self.expect(&Token::TagClose)?;
        }

        Ok(Element {
            name,
            attributes,
            children,
            span,
        })
    }

    /// attribute = NAME '=' VALUE
    fn parse_attribute(&mut self) -> Result<Attribute, CodecError> {
        let name = self.expect(&Token::Name)?;
        self.expect(&Token::Equals)?;
        let value = self.expect(&Token::AttributeValue)?;
        let span = Span::new(name.span.start, value.span.end);
        let raw = &value.text[1..value.text.len() - 1];
        Ok(Attribute {
            name: name.text,
            value: decode_entities(raw, &value.span)?,
            span,
        })
    }
}

fn unexpected(expected: &str, found: &SpannedToken) -> CodecError {
    CodecError::malformed(
        Malformed::UnexpectedToken {
            expected: expected.to_string(),
            found: format!("{} ('{}')", found.token.description(), found.text),
        },
        found.span.clone(),
    )
}

/// Replaces the predefined and numeric character references in an attribute value.
fn decode_entities(raw: &str, span: &Span) -> Result<String, CodecError> {
    if !raw.contains('&') {
        return Ok(raw.to_string());
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let invalid = |text: &str| {
            CodecError::malformed(
                Malformed::InvalidEntity {
                    text: text.to_string(),
                },
                span.clone(),
            )
        };
        let Some(semi) = rest.find(';') else {
            let text: String = rest.chars().take_while(|c| !c.is_whitespace()).collect();
            return Err(invalid(&text));
        };
        let entity = &rest[1..semi];
        let decoded = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => entity
                .strip_prefix("#x")
                .map(|hex| u32::from_str_radix(hex, 16))
                .or_else(|| entity.strip_prefix('#').map(str::parse::<u32>))
                .and_then(Result::ok)
                .and_then(char::from_u32),
        };
        match decoded {
            Some(c) => out.push(c),
            None => return Err(invalid(&rest[..=semi])),
        }
        rest = &rest[semi + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

/// Parses a token stream into the root element of the document.
///
/// # Errors
///
/// Returns `MalformedInput` at the first well-formedness problem.
pub fn parse_tokens(tokens: Vec<SpannedToken>) -> Result<Element, CodecError> {
    let mut parser = Parser::new(tokens);
    parser.parse_document()
}

/// Tokenizes and parses document text into its element tree.
///
/// # Errors
///
/// Returns `MalformedInput` for lexical and well-formedness problems.
pub fn parse_markup(source: &str) -> Result<Element, CodecError> {
    let tokens = crate::lexer::tokenize(source)?;
    parse_tokens(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn problem(source: &str) -> Malformed {
        match parse_markup(source).unwrap_err() {
            CodecError::MalformedInput { problem, .. } => problem,
            other => panic!("expected malformed input, got {other:?}"),
        }
    }

    #[test]
    fn parse_nested_elements() {
        let root = parse_markup(
            r#"<?xml version="1.0" encoding="UTF-8" ?>
<XMLDB PATH="mod/forum/db" VERSION="1">
  <TABLES>
    <TABLE NAME="forum"/>
  </TABLES>
</XMLDB>
"#,
        )
        .unwrap();
        assert_eq!(root.name, "XMLDB");
        assert_eq!(root.value("PATH"), Some("mod/forum/db"));
        assert_eq!(root.children.len(), 1);
        let tables = root.child("TABLES").unwrap();
        assert_eq!(tables.children[0].value("NAME"), Some("forum"));
    }

    #[test]
    fn nesting_limit_reports_start_tag() {
        let source = "<A>".repeat(100_000);
        let error = parse_markup(&source).unwrap_err();
        assert_eq!(
            error,
            CodecError::malformed(
                Malformed::NestingTooDeep { limit: MAX_DEPTH },
                Span::new(3 * MAX_DEPTH, 3 * MAX_DEPTH + 2),
            )
        );
    }

    #[test]
    fn nesting_at_limit_is_accepted() {
        let source = format!("{}{}", "<A>".repeat(MAX_DEPTH), "</A>".repeat(MAX_DEPTH));
        assert!(parse_markup(&source).is_ok());
    }

    #[test]
    fn declaration_is_optional() {
        let root = parse_markup("<XMLDB/>").unwrap();
        assert_eq!(root.name, "XMLDB");
        assert!(root.children.is_empty());
    }

    #[test]
    fn attribute_order_is_preserved() {
        let root = parse_markup(r#"<F B="1" A="2" C="3"/>"#).unwrap();
        let names: Vec<_> = root.attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A", "C"]);
    }

    #[test]
    fn element_span_covers_start_tag() {
        let source = r#"<A><B X="1"/></A>"#;
        let root = parse_markup(source).unwrap();
        assert_eq!(root.span, Span::new(0, 3));
        let b = &root.children[0];
        assert_eq!(&source[b.span.start..b.span.end], r#"<B X="1"/>"#);
        let x = b.attribute("X").unwrap();
        assert_eq!(&source[x.span.start..x.span.end], r#"X="1""#);
    }

    #[test]
    fn entities_are_decoded() {
        let root =
            parse_markup(r#"<A C="a &amp; b &lt;c&gt; &quot;d&quot; &apos;e&apos; &#65;&#x42;"/>"#)
                .unwrap();
        assert_eq!(root.value("C"), Some(r#"a & b <c> "d" 'e' AB"#));
    }

    #[test]
    fn unknown_entity_rejected() {
        assert_eq!(
            problem(r#"<A C="&nbsp;"/>"#),
            Malformed::InvalidEntity {
                text: "&nbsp;".into()
            }
        );
    }

    #[test]
    fn unterminated_entity_rejected() {
        assert!(matches!(
            problem(r#"<A C="fish & chips"/>"#),
            Malformed::InvalidEntity { .. }
        ));
    }

    #[test]
    fn unclosed_element() {
        assert_eq!(
            problem("<XMLDB><TABLES></XMLDB>"),
            Malformed::MismatchedClosingTag {
                expected: "TABLES".into(),
                found: "XMLDB".into(),
            }
        );
    }

    #[test]
    fn missing_end_tag_at_eof() {
        assert_eq!(
            problem("<XMLDB><TABLES/>"),
            Malformed::UnexpectedEndOfInput {
                expected: "</XMLDB>".into()
            }
        );
    }

    #[test]
    fn duplicate_attribute() {
        assert_eq!(
            problem(r#"<A N="1" N="2"/>"#),
            Malformed::DuplicateAttribute {
                element: "A".into(),
                attribute: "N".into(),
            }
        );
    }

    #[test]
    fn unquoted_attribute() {
        assert!(matches!(problem("<A N=1/>"), Malformed::InvalidToken));
    }

    #[test]
    fn character_data_rejected() {
        assert!(matches!(
            problem("<A>text</A>"),
            Malformed::UnexpectedToken { .. }
        ));
    }

    #[test]
    fn trailing_element_rejected() {
        let err = parse_markup("<A/><B/>").unwrap_err();
        assert_eq!(err.span(), &Span::new(4, 6));
    }

    #[test]
    fn empty_document() {
        assert!(matches!(
            problem(""),
            Malformed::UnexpectedEndOfInput { .. }
        ));
    }
}
