use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

use super::field_type::FieldType;

/// A typed default value for a field. Decimal values are stored as
/// strings to preserve `Eq`/`Hash` and round-trip fidelity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum DefaultValue {
    /// Default of an `int` field.
    Integer(i64),
    /// Default of a `number` or `float` field, e.g. `"0.00000"`.
    Decimal(String),
    /// Default of a `char` or `text` field. May be empty.
    Text(String),
}

impl DefaultValue {
    /// Interprets the raw `DEFAULT` attribute for a field of `field_type`.
    pub fn parse(field: &str, field_type: FieldType, raw: &str) -> Result<Self, SchemaError> {
        let invalid = || SchemaError::InvalidDefault {
            field: field.to_string(),
            value: raw.to_string(),
        };
        match field_type {
            FieldType::Integer => {
                if !is_integer_literal(raw) {
                    return Err(invalid());
                }
                raw.parse::<i64>().map(Self::Integer).map_err(|_| invalid())
            }
            FieldType::Number | FieldType::Float => {
                if !is_decimal_literal(raw) {
                    return Err(invalid());
                }
                Ok(Self::Decimal(raw.to_string()))
            }
            FieldType::Char | FieldType::Text => Ok(Self::Text(raw.to_string())),
            FieldType::Binary => Err(SchemaError::DefaultNotAllowed {
                field: field.to_string(),
                field_type: field_type.to_string(),
            }),
        }
    }

    /// Whether this value is of the shape `field_type` expects.
    pub fn fits(&self, field_type: FieldType) -> bool {
        matches!(
            (self, field_type),
            (Self::Integer(_), FieldType::Integer)
                | (Self::Decimal(_), FieldType::Number | FieldType::Float)
                | (Self::Text(_), FieldType::Char | FieldType::Text)
        )
    }
}

fn is_integer_literal(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn is_decimal_literal(s: &str) -> bool {
    match s.split_once('.') {
        Some((whole, frac)) => {
            is_integer_literal(whole) && !frac.is_empty() && frac.bytes().all(|b| b.is_ascii_digit())
        }
        None => is_integer_literal(s),
    }
}

/// Renders the attribute text, unescaped.
impl fmt::Display for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{i}"),
            Self::Decimal(s) | Self::Text(s) => f.write_str(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_default() {
        let dv = DefaultValue::parse("course", FieldType::Integer, "0").unwrap();
        assert_eq!(dv, DefaultValue::Integer(0));
        assert_eq!(dv.to_string(), "0");
        assert_eq!(
            DefaultValue::parse("x", FieldType::Integer, "-12").unwrap(),
            DefaultValue::Integer(-12)
        );
    }

    #[test]
    fn integer_default_rejects_junk() {
        for raw in ["", "abc", "1.5", "+3", "-", "99999999999999999999999"] {
            assert!(
                DefaultValue::parse("x", FieldType::Integer, raw).is_err(),
                "expected invalid: {raw:?}"
            );
        }
    }

    #[test]
    fn decimal_default_kept_verbatim() {
        let dv = DefaultValue::parse("grade", FieldType::Number, "0.00000").unwrap();
        assert_eq!(dv, DefaultValue::Decimal("0.00000".into()));
        assert_eq!(dv.to_string(), "0.00000");
    }

    #[test]
    fn decimal_default_rejects_junk() {
        for raw in ["", "1.", ".5", "1e5", "NaN", "1.2.3"] {
            assert!(
                DefaultValue::parse("x", FieldType::Float, raw).is_err(),
                "expected invalid: {raw:?}"
            );
        }
    }

    #[test]
    fn text_default_may_be_empty() {
        let dv = DefaultValue::parse("lang", FieldType::Char, "").unwrap();
        assert_eq!(dv, DefaultValue::Text(String::new()));
    }

    #[test]
    fn binary_takes_no_default() {
        assert!(matches!(
            DefaultValue::parse("data", FieldType::Binary, "x"),
            Err(SchemaError::DefaultNotAllowed { .. })
        ));
    }

    #[test]
    fn fits_matches_type() {
        assert!(DefaultValue::Integer(1).fits(FieldType::Integer));
        assert!(!DefaultValue::Integer(1).fits(FieldType::Char));
        assert!(DefaultValue::Decimal("1".into()).fits(FieldType::Float));
    }

    #[test]
    fn serde_roundtrip() {
        let values = vec![
            DefaultValue::Integer(42),
            DefaultValue::Decimal("3.14".into()),
            DefaultValue::Text("en".into()),
        ];
        for v in values {
            let json = serde_json::to_string(&v).unwrap();
            let back: DefaultValue = serde_json::from_str(&json).unwrap();
            assert_eq!(v, back);
        }
    }
}
