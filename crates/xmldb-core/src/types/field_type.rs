use serde::{Deserialize, Serialize};

/// Column types understood by the database abstraction layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Integer,
    Number,
    Float,
    Char,
    Text,
    Binary,
}

impl FieldType {
    pub const ALL: [FieldType; 6] = [
        Self::Integer,
        Self::Number,
        Self::Float,
        Self::Char,
        Self::Text,
        Self::Binary,
    ];

    /// The value of the `TYPE` attribute for this type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Integer => "int",
            Self::Number => "number",
            Self::Float => "float",
            Self::Char => "char",
            Self::Text => "text",
            Self::Binary => "binary",
        }
    }

    /// Looks up a type by its `TYPE` attribute value.
    pub fn from_attr(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }

    /// Largest `LENGTH` the type accepts, or `None` when it takes no length.
    pub fn max_length(self) -> Option<u32> {
        match self {
            Self::Integer => Some(20),
            Self::Number | Self::Float => Some(38),
            Self::Char => Some(1333),
            Self::Text | Self::Binary => None,
        }
    }

    pub fn requires_length(self) -> bool {
        matches!(self, Self::Integer | Self::Char | Self::Number)
    }

    pub fn allows_decimals(self) -> bool {
        matches!(self, Self::Number | Self::Float)
    }

    pub fn allows_default(self) -> bool {
        !matches!(self, Self::Binary)
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
