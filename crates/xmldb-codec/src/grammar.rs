//! Declarative element grammar for schema-description documents.
//!
//! The grammar is data rather than code: each element lists its required
//! and optional attributes and its ordered child content model.

use crate::error::{CodecError, Malformed};
use crate::parser::Element;

/// How many times a child element may appear at its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occurs {
    /// Exactly once.
    Once,
    /// Zero or one time.
    Optional,
    /// One or more times.
    OneOrMore,
}

impl Occurs {
    fn admits(self, count: usize) -> bool {
        match self {
            Self::Once => count == 1,
            Self::Optional => count <= 1,
            Self::OneOrMore => count >= 1,
        }
    }
}

/// One position in an element's content model.
#[derive(Debug, Clone, Copy)]
pub struct ChildRule {
    pub name: &'static str,
    pub occurs: Occurs,
}

/// Declaration of one element type.
#[derive(Debug, Clone, Copy)]
pub struct ElementDecl {
    pub name: &'static str,
    pub required: &'static [&'static str],
    pub optional: &'static [&'static str],
    /// Ordered sequence of child positions.
    pub content: &'static [ChildRule],
}

impl ElementDecl {
    fn declares(&self, attribute: &str) -> bool {
        self.required.contains(&attribute) || self.optional.contains(&attribute)
    }
}

/// A complete grammar: the root element name plus every element declaration.
#[derive(Debug, Clone, Copy)]
pub struct Grammar {
    pub root: &'static str,
    pub elements: &'static [ElementDecl],
}

const fn child(name: &'static str, occurs: Occurs) -> ChildRule {
    ChildRule { name, occurs }
}

/// The grammar of `install.xml` documents.
pub static XMLDB: Grammar = Grammar {
    root: "XMLDB",
    elements: &[
        ElementDecl {
            name: "XMLDB",
            required: &["PATH", "VERSION"],
            optional: &["COMMENT", "xmlns:xsi", "xsi:noNamespaceSchemaLocation"],
            content: &[child("TABLES", Occurs::Optional)],
        },
        ElementDecl {
            name: "TABLES",
            required: &[],
            optional: &[],
            content: &[child("TABLE", Occurs::OneOrMore)],
        },
        ElementDecl {
            name: "TABLE",
            required: &["NAME"],
            optional: &["COMMENT"],
            content: &[
                child("FIELDS", Occurs::Once),
                child("KEYS", Occurs::Once),
                child("INDEXES", Occurs::Optional),
            ],
        },
        ElementDecl {
            name: "FIELDS",
            required: &[],
            optional: &[],
            content: &[child("FIELD", Occurs::OneOrMore)],
        },
        ElementDecl {
            name: "FIELD",
            required: &["NAME", "TYPE", "NOTNULL", "SEQUENCE"],
            optional: &["LENGTH", "DEFAULT", "DECIMALS", "COMMENT"],
            content: &[],
        },
        ElementDecl {
            name: "KEYS",
            required: &[],
            optional: &[],
            content: &[child("KEY", Occurs::OneOrMore)],
        },
        ElementDecl {
            name: "KEY",
            required: &["NAME", "TYPE", "FIELDS"],
            optional: &["REFTABLE", "REFFIELDS", "COMMENT"],
            content: &[],
        },
        ElementDecl {
            name: "INDEXES",
            required: &[],
            optional: &[],
            content: &[child("INDEX", Occurs::OneOrMore)],
        },
        ElementDecl {
            name: "INDEX",
            required: &["NAME", "UNIQUE", "FIELDS"],
            optional: &["HINTS", "COMMENT"],
            content: &[],
        },
    ],
};

impl Grammar {
    pub fn element(&self, name: &str) -> Option<&ElementDecl> {
        self.elements.iter().find(|d| d.name == name)
    }

    /// Checks an element tree against this grammar.
    ///
    /// # Errors
    ///
    /// Returns `MalformedInput` at the first element or attribute that the
    /// grammar does not admit.
    pub fn validate(&self, root: &Element) -> Result<(), CodecError> {
        if root.name != self.root {
            return Err(CodecError::malformed(
                Malformed::UnexpectedRoot {
                    expected: self.root.to_string(),
                    found: root.name.clone(),
                },
                root.span.clone(),
            ));
        }
        self.validate_element(root)
    }

    fn validate_element(&self, element: &Element) -> Result<(), CodecError> {
        // Children are only ever visited through a parent's content model,
        // so every element reaching here has a declaration.
        let Some(decl) = self.element(&element.name) else {
            return Ok(());
        };

        for attribute in &element.attributes {
            if !decl.declares(&attribute.name) {
                return Err(CodecError::malformed(
                    Malformed::UnknownAttribute {
                        element: element.name.clone(),
                        attribute: attribute.name.clone(),
                    },
                    attribute.span.clone(),
                ));
            }
        }
        if let Some(missing) = decl
            .required
            .iter()
            .find(|name| element.attribute(name).is_none())
        {
            return Err(CodecError::malformed(
                Malformed::MissingAttribute {
                    element: element.name.clone(),
                    attribute: (*missing).to_string(),
                },
                element.span.clone(),
            ));
        }

        let mut pos = 0;
        for rule in decl.content {
            let count = element.children[pos..]
                .iter()
                .take_while(|c| c.name == rule.name)
                .count();
            if count > 1 && !rule.occurs.admits(count) {
                return Err(CodecError::malformed(
                    Malformed::UnexpectedElement {
                        parent: element.name.clone(),
                        found: rule.name.to_string(),
                    },
                    element.children[pos + 1].span.clone(),
                ));
            }
            if !rule.occurs.admits(count) {
                return Err(CodecError::malformed(
                    Malformed::MissingElement {
                        parent: element.name.clone(),
                        expected: rule.name.to_string(),
                    },
                    element
                        .children
                        .get(pos)
                        .map_or(element.span.clone(), |c| c.span.clone()),
                ));
            }
            pos += count;
        }
        if let Some(extra) = element.children.get(pos) {
            return Err(CodecError::malformed(
                Malformed::UnexpectedElement {
                    parent: element.name.clone(),
                    found: extra.name.clone(),
                },
                extra.span.clone(),
            ));
        }

        for c in &element.children {
            self.validate_element(c)?;
        }
        Ok(())
    }
}
