use logos::Logos;

/// Tokens of the XML subset used by schema-description documents.
///
/// Whitespace between tags and `<!-- -->` comments are skipped. Character
/// data has no token: documents carry all information in attributes.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
#[logos(skip r"<!--([^-]|-[^-])*-->")]
pub enum Token {
    /// The `<?xml ... ?>` declaration.
    #[regex(r"<\?xml[^?]*\?>")]
    Declaration,

    /// `<` immediately followed by an element name.
    #[regex(r"<[A-Za-z_][A-Za-z0-9_.:\-]*")]
    StartTagOpen,

    /// `</` immediately followed by an element name.
    #[regex(r"</[A-Za-z_][A-Za-z0-9_.:\-]*")]
    EndTagOpen,

    #[token(">")]
    TagClose,

    #[token("/>")]
    EmptyTagClose,

    #[token("=")]
    Equals,

    /// A quoted attribute value, quotes included.
    #[regex(r#""[^"<]*""#)]
    #[regex(r"'[^'<]*'")]
    AttributeValue,

    /// An attribute name, possibly namespaced (`xsi:noNamespaceSchemaLocation`).
    #[regex(r"[A-Za-z_][A-Za-z0-9_.:\-]*")]
    Name,
}

impl Token {
    /// Returns a human-readable description of this token kind.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Declaration => "XML declaration",
            Self::StartTagOpen => "start tag",
            Self::EndTagOpen => "end tag",
            Self::TagClose => "'>'",
            Self::EmptyTagClose => "'/>'",
            Self::Equals => "'='",
            Self::AttributeValue => "quoted value",
            Self::Name => "name",
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}
