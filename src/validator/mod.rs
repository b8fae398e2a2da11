//! Recursive instance validation.
//!
//! A validator is built over one schema and walks an instance depth first:
//! type gate, then type-specialized checks, then the keyword-orthogonal
//! checks (`enum` and the combinators). Combinator members run in fresh
//! sub-validators sharing the definitions table, so their diagnostics stay
//! scoped and only the summarizing diagnostic reaches the outer report.

pub mod diagnostics;

use indexmap::IndexMap;
use regex::Regex;
use tracing::debug;

use crate::error::{SchemaError, SchemaResult};
use crate::instance::parser::parse_instance;
use crate::instance::value::{Instance, InstanceKind};
use crate::schema::model::{AdditionalProperties, Items, Schema, SimpleType};

pub use diagnostics::{Diagnostic, DiagnosticKind, ValidationReport};

use diagnostics::{format_instance, format_value_list};

/// Validates JSON instances against one schema.
///
/// Not reentrant: a validator owns its report exclusively. Schemas are
/// immutable after construction and may back any number of validators.
pub struct Validator<'a> {
    root: &'a Schema,
    definitions: Option<&'a IndexMap<String, Schema>>,
    report: ValidationReport,
}

impl<'a> Validator<'a> {
    /// Build a validator over `schema`, resolving a root-level reference
    /// against the schema's own definitions table.
    pub fn new(schema: &'a Schema) -> SchemaResult<Self> {
        let mut validator = Self {
            root: schema,
            definitions: schema.definitions.as_ref(),
            report: ValidationReport::new(),
        };
        validator.root = validator.resolve(schema)?;
        Ok(validator)
    }

    /// Validate instance text, returning formatted diagnostics in
    /// emission order. An empty list means the instance is valid.
    ///
    /// Fails with [`SchemaError::MalformedJson`] when the instance text
    /// does not parse; diagnostics never travel on the error channel.
    pub fn validate(&mut self, instance_text: &str) -> SchemaResult<Vec<String>> {
        debug!(bytes = instance_text.len(), "validating instance");
        self.report = ValidationReport::new();
        let instance = parse_instance(instance_text)?;
        let root = self.root;
        self.validate_token(&instance, root)?;
        Ok(self.report.messages(instance_text))
    }

    /// Structured diagnostics from the most recent `validate` call.
    pub fn report(&self) -> &ValidationReport {
        &self.report
    }

    fn subvalidator(&self) -> Validator<'a> {
        Validator {
            root: self.root,
            definitions: self.definitions,
            report: ValidationReport::new(),
        }
    }

    /// Replace a schema carrying a reference by its definition target.
    fn resolve(&self, schema: &'a Schema) -> SchemaResult<&'a Schema> {
        match &schema.reference {
            None => Ok(schema),
            Some(reference) => {
                let name = reference.definition_name()?;
                self.definitions
                    .and_then(|definitions| definitions.get(name))
                    .ok_or_else(|| SchemaError::DefinitionNotFound {
                        name: name.to_string(),
                    })
            }
        }
    }

    fn validate_token(&mut self, token: &Instance, schema: &'a Schema) -> SchemaResult<()> {
        // Type gate: a failed gate stops every other check at this node.
        if let Some(types) = schema.types.as_deref() {
            if !types.is_empty() && !type_matches(&token.kind, types) {
                self.report.push(Diagnostic {
                    span: token.span,
                    kind: DiagnosticKind::WrongType {
                        expected: types.to_vec(),
                        actual: token.kind.type_name(),
                    },
                });
                return Ok(());
            }
        }

        match &token.kind {
            InstanceKind::String(text) => self.check_string(token, text, schema)?,
            InstanceKind::Integer(i) => self.check_number(token, *i as f64, schema),
            InstanceKind::Float(f) => self.check_number(token, *f, schema),
            InstanceKind::Object(members) => self.check_object(token, members, schema)?,
            InstanceKind::Array(elements) => self.check_array(token, elements, schema)?,
            InstanceKind::Null | InstanceKind::Boolean(_) | InstanceKind::Date(_) => {}
        }

        self.check_enum(token, schema);
        self.check_combinators(token, schema)?;
        Ok(())
    }

    fn check_string(&mut self, token: &Instance, text: &str, schema: &Schema) -> SchemaResult<()> {
        let length = text.chars().count();
        if let Some(limit) = schema.max_length {
            if length as u64 > limit {
                self.report.push(Diagnostic {
                    span: token.span,
                    kind: DiagnosticKind::StringTooLong { length, limit },
                });
            }
        }
        if let Some(limit) = schema.min_length {
            if (length as u64) < limit {
                self.report.push(Diagnostic {
                    span: token.span,
                    kind: DiagnosticKind::StringTooShort { length, limit },
                });
            }
        }
        if let Some(pattern) = &schema.pattern {
            let matcher = compile_pattern(pattern)?;
            if !matcher.is_match(text) {
                self.report.push(Diagnostic {
                    span: token.span,
                    kind: DiagnosticKind::StringDoesNotMatchPattern {
                        value: text.to_string(),
                        pattern: pattern.clone(),
                    },
                });
            }
        }
        Ok(())
    }

    fn check_number(&mut self, token: &Instance, value: f64, schema: &Schema) {
        if let Some(limit) = schema.maximum {
            if schema.exclusive_maximum == Some(true) {
                if value >= limit {
                    self.report.push(Diagnostic {
                        span: token.span,
                        kind: DiagnosticKind::ValueTooLargeExclusive { value, limit },
                    });
                }
            } else if value > limit {
                self.report.push(Diagnostic {
                    span: token.span,
                    kind: DiagnosticKind::ValueTooLarge { value, limit },
                });
            }
        }
        if let Some(limit) = schema.minimum {
            if schema.exclusive_minimum == Some(true) {
                if value <= limit {
                    self.report.push(Diagnostic {
                        span: token.span,
                        kind: DiagnosticKind::ValueTooSmallExclusive { value, limit },
                    });
                }
            } else if value < limit {
                self.report.push(Diagnostic {
                    span: token.span,
                    kind: DiagnosticKind::ValueTooSmall { value, limit },
                });
            }
        }
        if let Some(multiple_of) = schema.multiple_of {
            if value % multiple_of != 0.0 {
                self.report.push(Diagnostic {
                    span: token.span,
                    kind: DiagnosticKind::NotAMultiple { value, multiple_of },
                });
            }
        }
    }

    fn check_object(
        &mut self,
        token: &Instance,
        members: &[(String, Instance)],
        schema: &'a Schema,
    ) -> SchemaResult<()> {
        let count = members.len();
        if let Some(limit) = schema.max_properties {
            if count as u64 > limit {
                self.report.push(Diagnostic {
                    span: token.span,
                    kind: DiagnosticKind::TooManyProperties { count, limit },
                });
            }
        }
        if let Some(limit) = schema.min_properties {
            if (count as u64) < limit {
                self.report.push(Diagnostic {
                    span: token.span,
                    kind: DiagnosticKind::TooFewProperties { count, limit },
                });
            }
        }
        if let Some(required) = &schema.required {
            for name in required {
                if !members.iter().any(|(key, _)| key == name) {
                    self.report.push(Diagnostic {
                        span: token.span,
                        kind: DiagnosticKind::RequiredPropertyMissing { name: name.clone() },
                    });
                }
            }
        }

        if let Some(properties) = &schema.properties {
            for (name, member) in members {
                if let Some(sub) = properties.get(name) {
                    let sub = self.resolve(sub)?;
                    self.validate_token(member, sub)?;
                }
            }
        }

        // Additional property names: instance members minus `properties`
        // keys, thinned out by matching patternProperties.
        let mut additional: Vec<&(String, Instance)> = members
            .iter()
            .filter(|(name, _)| {
                schema
                    .properties
                    .as_ref()
                    .map_or(true, |properties| !properties.contains_key(name))
            })
            .collect();

        if let Some(patterns) = &schema.pattern_properties {
            for (pattern, sub) in patterns {
                let matcher = compile_pattern(pattern)?;
                let sub = self.resolve(sub)?;
                let mut kept = Vec::new();
                for entry in additional {
                    if matcher.is_match(&entry.0) {
                        self.validate_token(&entry.1, sub)?;
                    } else {
                        kept.push(entry);
                    }
                }
                additional = kept;
            }
        }

        match &schema.additional_properties {
            Some(AdditionalProperties::Allowed(false)) => {
                for (name, member) in additional {
                    self.report.push(Diagnostic {
                        span: member.span,
                        kind: DiagnosticKind::AdditionalPropertiesProhibited {
                            name: name.clone(),
                        },
                    });
                }
            }
            Some(AdditionalProperties::Schema(sub)) => {
                let sub = self.resolve(sub)?;
                for (_, member) in additional {
                    self.validate_token(member, sub)?;
                }
            }
            Some(AdditionalProperties::Allowed(true)) | None => {}
        }
        Ok(())
    }

    fn check_array(
        &mut self,
        token: &Instance,
        elements: &[Instance],
        schema: &'a Schema,
    ) -> SchemaResult<()> {
        let count = elements.len();
        if let Some(limit) = schema.min_items {
            if (count as u64) < limit {
                self.report.push(Diagnostic {
                    span: token.span,
                    kind: DiagnosticKind::TooFewArrayItems { count, limit },
                });
            }
        }
        if let Some(limit) = schema.max_items {
            if count as u64 > limit {
                self.report.push(Diagnostic {
                    span: token.span,
                    kind: DiagnosticKind::TooManyArrayItems { count, limit },
                });
            }
        }

        match &schema.items {
            Some(Items::Single(sub)) => {
                let sub = self.resolve(sub)?;
                for element in elements {
                    self.validate_token(element, sub)?;
                }
            }
            Some(Items::Tuple(subs)) => {
                if subs.len() >= count {
                    for (element, sub) in elements.iter().zip(subs) {
                        let sub = self.resolve(sub)?;
                        self.validate_token(element, sub)?;
                    }
                } else {
                    self.report.push(Diagnostic {
                        span: token.span,
                        kind: DiagnosticKind::TooFewItemSchemas {
                            count,
                            schemas: subs.len(),
                        },
                    });
                }
            }
            None => {}
        }

        if schema.unique_items == Some(true) && distinct_count(elements) < count {
            self.report.push(Diagnostic {
                span: token.span,
                kind: DiagnosticKind::NotUnique,
            });
        }
        Ok(())
    }

    fn check_enum(&mut self, token: &Instance, schema: &Schema) {
        if let Some(allowed) = &schema.enum_values {
            if !allowed.iter().any(|value| token.kind.matches_value(value)) {
                self.report.push(Diagnostic {
                    span: token.span,
                    kind: DiagnosticKind::InvalidEnumValue {
                        value: format_instance(token),
                        allowed: format_value_list(allowed),
                    },
                });
            }
        }
    }

    fn check_combinators(&mut self, token: &Instance, schema: &'a Schema) -> SchemaResult<()> {
        if let Some(all_of) = &schema.all_of {
            let mut collected = Vec::new();
            for sub in all_of {
                let sub = self.resolve(sub)?;
                let mut nested = self.subvalidator();
                nested.validate_token(token, sub)?;
                collected.extend(nested.report.into_diagnostics());
            }
            if !collected.is_empty() {
                self.report.push(Diagnostic {
                    span: token.span,
                    kind: DiagnosticKind::NotAllOf {
                        count: all_of.len(),
                    },
                });
            }
        }

        if let Some(any_of) = &schema.any_of {
            let mut matched = false;
            for sub in any_of {
                let sub = self.resolve(sub)?;
                let mut nested = self.subvalidator();
                nested.validate_token(token, sub)?;
                if nested.report.is_empty() {
                    matched = true;
                    break;
                }
            }
            if !matched {
                self.report.push(Diagnostic {
                    span: token.span,
                    kind: DiagnosticKind::NotAnyOf {
                        count: any_of.len(),
                    },
                });
            }
        }

        if let Some(one_of) = &schema.one_of {
            let mut matched = 0usize;
            for sub in one_of {
                let sub = self.resolve(sub)?;
                let mut nested = self.subvalidator();
                nested.validate_token(token, sub)?;
                if nested.report.is_empty() {
                    matched += 1;
                }
            }
            if matched != 1 {
                self.report.push(Diagnostic {
                    span: token.span,
                    kind: DiagnosticKind::NotOneOf {
                        matched,
                        count: one_of.len(),
                    },
                });
            }
        }

        if let Some(not) = &schema.not {
            let sub = self.resolve(not)?;
            let mut nested = self.subvalidator();
            nested.validate_token(token, sub)?;
            if nested.report.is_empty() {
                self.report.push(Diagnostic {
                    span: token.span,
                    kind: DiagnosticKind::ValidatesAgainstNotSchema,
                });
            }
        }
        Ok(())
    }
}

/// Type gate: the instance type must appear in the expected set, with
/// Integer admitted by Number and Date admitted by String.
fn type_matches(kind: &InstanceKind, types: &[SimpleType]) -> bool {
    types.iter().any(|expected| match (kind, expected) {
        (InstanceKind::Null, SimpleType::Null) => true,
        (InstanceKind::Boolean(_), SimpleType::Boolean) => true,
        (InstanceKind::Integer(_), SimpleType::Integer | SimpleType::Number) => true,
        (InstanceKind::Float(_), SimpleType::Number) => true,
        (InstanceKind::String(_) | InstanceKind::Date(_), SimpleType::String) => true,
        (InstanceKind::Array(_), SimpleType::Array) => true,
        (InstanceKind::Object(_), SimpleType::Object) => true,
        _ => false,
    })
}

fn distinct_count(elements: &[Instance]) -> usize {
    let mut distinct = 0;
    for (i, element) in elements.iter().enumerate() {
        if !elements[..i].iter().any(|prior| prior.deep_equals(element)) {
            distinct += 1;
        }
    }
    distinct
}

fn compile_pattern(pattern: &str) -> SchemaResult<Regex> {
    Regex::new(pattern).map_err(|e| {
        SchemaError::TypeMismatch(format!(
            "'{}' is not a valid regular expression: {}",
            pattern, e
        ))
    })
}
