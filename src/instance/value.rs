//! Typed JSON value tree for the validator.
//!
//! Integers and floats stay distinct so that an integer instance can
//! satisfy a `number` schema type while a float cannot satisfy `integer`.
//! Strings that parse as ISO 8601 dates are tagged `Date` by the parser;
//! a `Date` satisfies a `string` schema type.

use crate::instance::span::Span;

/// A parsed instance token with its source span.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    pub kind: InstanceKind,
    pub span: Span,
}

/// The value held by an instance token. Object members keep their source
/// order.
#[derive(Debug, Clone, PartialEq)]
pub enum InstanceKind {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Date(String),
    Array(Vec<Instance>),
    Object(Vec<(String, Instance)>),
}

impl Instance {
    /// Name of this token's JSON type, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    /// Structural deep equality; numbers compare by value.
    pub fn deep_equals(&self, other: &Instance) -> bool {
        self.kind.deep_equals(&other.kind)
    }
}

impl InstanceKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "Null",
            Self::Boolean(_) => "Boolean",
            Self::Integer(_) => "Integer",
            Self::Float(_) => "Float",
            Self::String(_) => "String",
            Self::Date(_) => "Date",
            Self::Array(_) => "Array",
            Self::Object(_) => "Object",
        }
    }

    /// Deep equality between two tokens: numbers by value, strings by
    /// code point, arrays element-wise, objects as unordered key/value
    /// sets. A `Date` compares as its underlying text.
    pub fn deep_equals(&self, other: &InstanceKind) -> bool {
        use InstanceKind as K;
        match (self, other) {
            (K::Null, K::Null) => true,
            (K::Boolean(a), K::Boolean(b)) => a == b,
            (K::Integer(a), K::Integer(b)) => a == b,
            (K::Float(a), K::Float(b)) => a == b,
            (K::Integer(a), K::Float(b)) | (K::Float(b), K::Integer(a)) => *a as f64 == *b,
            (K::String(a) | K::Date(a), K::String(b) | K::Date(b)) => a == b,
            (K::Array(a), K::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.deep_equals(y))
            }
            (K::Object(a), K::Object(b)) => {
                a.len() == b.len()
                    && a.iter().all(|(key, value)| {
                        b.iter()
                            .find(|(other_key, _)| other_key == key)
                            .is_some_and(|(_, other_value)| value.deep_equals(other_value))
                    })
            }
            _ => false,
        }
    }

    /// Deep equality against a schema-side literal (an `enum` member).
    pub fn matches_value(&self, value: &serde_json::Value) -> bool {
        use serde_json::Value;
        match (self, value) {
            (Self::Null, Value::Null) => true,
            (Self::Boolean(a), Value::Bool(b)) => a == b,
            (Self::Integer(a), Value::Number(n)) => {
                n.as_f64().is_some_and(|f| *a as f64 == f)
            }
            (Self::Float(a), Value::Number(n)) => n.as_f64().is_some_and(|f| *a == f),
            (Self::String(a) | Self::Date(a), Value::String(b)) => a == b,
            (Self::Array(a), Value::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.kind.matches_value(y))
            }
            (Self::Object(a), Value::Object(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .all(|(key, member)| {
                            b.get(key).is_some_and(|v| member.kind.matches_value(v))
                        })
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(kind: InstanceKind) -> Instance {
        Instance {
            kind,
            span: Span::default(),
        }
    }

    #[test]
    fn numbers_compare_by_value() {
        assert!(InstanceKind::Integer(1).deep_equals(&InstanceKind::Float(1.0)));
        assert!(!InstanceKind::Integer(1).deep_equals(&InstanceKind::Float(1.5)));
    }

    #[test]
    fn dates_compare_as_their_text() {
        let date = InstanceKind::Date("2024-01-01".to_string());
        let text = InstanceKind::String("2024-01-01".to_string());
        assert!(date.deep_equals(&text));
    }

    #[test]
    fn objects_compare_unordered() {
        let a = InstanceKind::Object(vec![
            ("x".to_string(), token(InstanceKind::Integer(1))),
            ("y".to_string(), token(InstanceKind::Integer(2))),
        ]);
        let b = InstanceKind::Object(vec![
            ("y".to_string(), token(InstanceKind::Integer(2))),
            ("x".to_string(), token(InstanceKind::Integer(1))),
        ]);
        assert!(a.deep_equals(&b));
    }

    #[test]
    fn enum_membership_uses_numeric_value_equality() {
        let one = InstanceKind::Integer(1);
        assert!(one.matches_value(&serde_json::json!(1.0)));
        assert!(!one.matches_value(&serde_json::json!(2)));
    }
}
