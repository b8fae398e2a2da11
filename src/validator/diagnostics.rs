//! Validation diagnostics: numbered kinds, argument formatting, and the
//! ordered report.

use crate::instance::span::Span;
use crate::instance::value::{Instance, InstanceKind};
use crate::schema::model::SimpleType;

/// A single validation diagnostic anchored to an instance token.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub span: Span,
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    /// Render as `<line>:<column>: error[<code>]: <message>`.
    pub fn render(&self, source: &str) -> String {
        let (line, column) = self.span.line_col(source);
        format!(
            "{}:{}: error[{}]: {}",
            line,
            column,
            self.kind.code(),
            self.kind.message()
        )
    }
}

/// Kind of validation diagnostic. The set is closed and each kind has a
/// stable number.
#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosticKind {
    /// Instance type not in the schema's `type` set
    WrongType {
        expected: Vec<SimpleType>,
        actual: &'static str,
    },
    StringTooLong {
        length: usize,
        limit: u64,
    },
    StringTooShort {
        length: usize,
        limit: u64,
    },
    StringDoesNotMatchPattern {
        value: String,
        pattern: String,
    },
    ValueTooLarge {
        value: f64,
        limit: f64,
    },
    ValueTooLargeExclusive {
        value: f64,
        limit: f64,
    },
    ValueTooSmall {
        value: f64,
        limit: f64,
    },
    ValueTooSmallExclusive {
        value: f64,
        limit: f64,
    },
    NotAMultiple {
        value: f64,
        multiple_of: f64,
    },
    TooFewArrayItems {
        count: usize,
        limit: u64,
    },
    TooManyArrayItems {
        count: usize,
        limit: u64,
    },
    /// Tuple-form `items` with fewer schemas than the array has elements
    TooFewItemSchemas {
        count: usize,
        schemas: usize,
    },
    NotUnique,
    TooManyProperties {
        count: usize,
        limit: u64,
    },
    TooFewProperties {
        count: usize,
        limit: u64,
    },
    RequiredPropertyMissing {
        name: String,
    },
    AdditionalPropertiesProhibited {
        name: String,
    },
    /// Instance deep-equals no `enum` member; both sides preformatted
    InvalidEnumValue {
        value: String,
        allowed: String,
    },
    NotAllOf {
        count: usize,
    },
    NotAnyOf {
        count: usize,
    },
    NotOneOf {
        matched: usize,
        count: usize,
    },
    ValidatesAgainstNotSchema,
}

impl DiagnosticKind {
    /// Stable diagnostic number.
    pub fn code(&self) -> &'static str {
        match self {
            Self::WrongType { .. } => "V001",
            Self::StringTooLong { .. } => "V002",
            Self::StringTooShort { .. } => "V003",
            Self::StringDoesNotMatchPattern { .. } => "V004",
            Self::ValueTooLarge { .. } => "V005",
            Self::ValueTooLargeExclusive { .. } => "V006",
            Self::ValueTooSmall { .. } => "V007",
            Self::ValueTooSmallExclusive { .. } => "V008",
            Self::NotAMultiple { .. } => "V009",
            Self::TooFewArrayItems { .. } => "V010",
            Self::TooManyArrayItems { .. } => "V011",
            Self::TooFewItemSchemas { .. } => "V012",
            Self::NotUnique => "V013",
            Self::TooManyProperties { .. } => "V014",
            Self::TooFewProperties { .. } => "V015",
            Self::RequiredPropertyMissing { .. } => "V016",
            Self::AdditionalPropertiesProhibited { .. } => "V017",
            Self::InvalidEnumValue { .. } => "V018",
            Self::NotAllOf { .. } => "V019",
            Self::NotAnyOf { .. } => "V020",
            Self::NotOneOf { .. } => "V021",
            Self::ValidatesAgainstNotSchema => "V022",
        }
    }

    /// Human-readable message with formatted arguments.
    pub fn message(&self) -> String {
        match self {
            Self::WrongType { expected, actual } => {
                let names: Vec<String> = expected.iter().map(|t| t.to_string()).collect();
                format!("expected type [{}], found {}", names.join(", "), actual)
            }
            Self::StringTooLong { length, limit } => {
                format!("string length {} exceeds maxLength {}", length, limit)
            }
            Self::StringTooShort { length, limit } => {
                format!("string length {} is less than minLength {}", length, limit)
            }
            Self::StringDoesNotMatchPattern { value, pattern } => {
                format!("{} does not match pattern {}", quote(value), quote(pattern))
            }
            Self::ValueTooLarge { value, limit } => {
                format!("value {} exceeds maximum {}", value, limit)
            }
            Self::ValueTooLargeExclusive { value, limit } => {
                format!("value {} must be less than exclusive maximum {}", value, limit)
            }
            Self::ValueTooSmall { value, limit } => {
                format!("value {} is less than minimum {}", value, limit)
            }
            Self::ValueTooSmallExclusive { value, limit } => format!(
                "value {} must be greater than exclusive minimum {}",
                value, limit
            ),
            Self::NotAMultiple { value, multiple_of } => {
                format!("value {} is not a multiple of {}", value, multiple_of)
            }
            Self::TooFewArrayItems { count, limit } => {
                format!("array has {} items, fewer than minItems {}", count, limit)
            }
            Self::TooManyArrayItems { count, limit } => {
                format!("array has {} items, more than maxItems {}", count, limit)
            }
            Self::TooFewItemSchemas { count, schemas } => {
                format!("array has {} items but only {} item schemas", count, schemas)
            }
            Self::NotUnique => "array items are not unique".to_string(),
            Self::TooManyProperties { count, limit } => format!(
                "object has {} properties, more than maxProperties {}",
                count, limit
            ),
            Self::TooFewProperties { count, limit } => format!(
                "object has {} properties, fewer than minProperties {}",
                count, limit
            ),
            Self::RequiredPropertyMissing { name } => {
                format!("required property {} is missing", quote(name))
            }
            Self::AdditionalPropertiesProhibited { name } => {
                format!("additional property {} is prohibited", quote(name))
            }
            Self::InvalidEnumValue { value, allowed } => {
                format!("value {} is not one of the enum values {}", value, allowed)
            }
            Self::NotAllOf { count } => format!(
                "instance does not match all of the {} schemas in allOf",
                count
            ),
            Self::NotAnyOf { count } => format!(
                "instance does not match any of the {} schemas in anyOf",
                count
            ),
            Self::NotOneOf { matched, count } => format!(
                "instance matches {} of the {} schemas in oneOf, expected exactly one",
                matched, count
            ),
            Self::ValidatesAgainstNotSchema => {
                "instance must not match the not schema".to_string()
            }
        }
    }
}

/// Ordered collection of diagnostics for one validation run.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    diagnostics: Vec<Diagnostic>,
}

impl ValidationReport {
    /// Create a new empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Whether no diagnostics were emitted (the instance is valid).
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Number of diagnostics.
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Render every diagnostic against the instance source, in emission
    /// order.
    pub fn messages(&self, source: &str) -> Vec<String> {
        self.diagnostics.iter().map(|d| d.render(source)).collect()
    }
}

/// Render a schema-side literal for a message: strings double-quoted,
/// booleans lowercased, arrays compacted with a single space after each
/// comma, `null` as the literal.
pub(crate) fn format_value(value: &serde_json::Value) -> String {
    use serde_json::Value;
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => quote(s),
        Value::Array(items) => {
            let rendered: Vec<String> = items.iter().map(format_value).collect();
            format!("[{}]", rendered.join(", "))
        }
        Value::Object(members) => {
            let rendered: Vec<String> = members
                .iter()
                .map(|(key, value)| format!("{}: {}", quote(key), format_value(value)))
                .collect();
            format!("{{{}}}", rendered.join(", "))
        }
    }
}

/// Render a list of literals as compacted array text.
pub(crate) fn format_value_list(values: &[serde_json::Value]) -> String {
    let rendered: Vec<String> = values.iter().map(format_value).collect();
    format!("[{}]", rendered.join(", "))
}

/// Render an instance token with the same rules as [`format_value`].
pub(crate) fn format_instance(instance: &Instance) -> String {
    match &instance.kind {
        InstanceKind::Null => "null".to_string(),
        InstanceKind::Boolean(b) => b.to_string(),
        InstanceKind::Integer(i) => i.to_string(),
        InstanceKind::Float(f) => f.to_string(),
        InstanceKind::String(s) | InstanceKind::Date(s) => quote(s),
        InstanceKind::Array(elements) => {
            let rendered: Vec<String> = elements.iter().map(format_instance).collect();
            format!("[{}]", rendered.join(", "))
        }
        InstanceKind::Object(members) => {
            let rendered: Vec<String> = members
                .iter()
                .map(|(key, value)| format!("{}: {}", quote(key), format_instance(value)))
                .collect();
            format!("{{{}}}", rendered.join(", "))
        }
    }
}

fn quote(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| format!("\"{}\"", text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strings_are_quoted_and_booleans_lowercased() {
        assert_eq!(format_value(&json!("abc")), "\"abc\"");
        assert_eq!(format_value(&json!(true)), "true");
        assert_eq!(format_value(&json!(null)), "null");
    }

    #[test]
    fn arrays_are_compacted() {
        assert_eq!(format_value(&json!([1, "a", false])), "[1, \"a\", false]");
        assert_eq!(format_value_list(&[json!(1), json!(2)]), "[1, 2]");
    }

    #[test]
    fn objects_render_with_quoted_keys() {
        assert_eq!(format_value(&json!({"k": [1, 2]})), "{\"k\": [1, 2]}");
    }

    #[test]
    fn codes_are_stable() {
        assert_eq!(
            DiagnosticKind::WrongType {
                expected: vec![SimpleType::String],
                actual: "Integer"
            }
            .code(),
            "V001"
        );
        assert_eq!(DiagnosticKind::ValidatesAgainstNotSchema.code(), "V022");
    }

    #[test]
    fn wrong_type_message_names_both_sides() {
        let kind = DiagnosticKind::WrongType {
            expected: vec![SimpleType::String],
            actual: "Integer",
        };
        assert_eq!(kind.message(), "expected type [String], found Integer");
    }

    #[test]
    fn render_prefixes_the_location() {
        let diagnostic = Diagnostic {
            span: Span::new(0, 2),
            kind: DiagnosticKind::NotUnique,
        };
        assert_eq!(
            diagnostic.render("[1]"),
            "1:1: error[V013]: array items are not unique"
        );
    }

    #[test]
    fn integral_floats_render_without_a_fraction() {
        let kind = DiagnosticKind::ValueTooLarge {
            value: 11.0,
            limit: 10.0,
        };
        assert_eq!(kind.message(), "value 11 exceeds maximum 10");
    }
}
