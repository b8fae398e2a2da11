//! Parse JSON text into the schema model.
//!
//! Deserialization is handled by serde directly, so `$ref` binds to the
//! `reference` field without the textual `$ref` to `$$ref` rewrite some
//! JSON libraries force. After deserialization every fragment reference in
//! the tree is checked to point at `#/definitions/<name>`.

use serde_json::error::Category;

use crate::error::{SchemaError, SchemaResult};
use crate::schema::model::{AdditionalProperties, Items, Schema};

impl Schema {
    /// Parse a schema from JSON text.
    ///
    /// Fails with [`SchemaError::MalformedJson`] on invalid JSON,
    /// [`SchemaError::TypeMismatch`] when a keyword holds the wrong JSON
    /// type, and [`SchemaError::InvalidReferenceForm`] on a fragment
    /// reference that does not target a definition.
    pub fn from_json(text: &str) -> SchemaResult<Schema> {
        let schema: Schema = serde_json::from_str(text).map_err(classify)?;
        check_references(&schema)?;
        Ok(schema)
    }
}

fn classify(err: serde_json::Error) -> SchemaError {
    match err.classify() {
        Category::Data => SchemaError::TypeMismatch(err.to_string()),
        Category::Syntax | Category::Eof | Category::Io => {
            SchemaError::MalformedJson(err.to_string())
        }
    }
}

/// Reject fragment references that do not target `#/definitions/<name>`,
/// anywhere in the tree.
fn check_references(schema: &Schema) -> SchemaResult<()> {
    if let Some(reference) = &schema.reference {
        if reference.is_fragment() {
            reference.definition_name()?;
        }
    }
    match &schema.items {
        Some(Items::Single(sub)) => check_references(sub)?,
        Some(Items::Tuple(subs)) => {
            for sub in subs {
                check_references(sub)?;
            }
        }
        None => {}
    }
    for mapping in [&schema.properties, &schema.definitions, &schema.pattern_properties] {
        if let Some(mapping) = mapping {
            for sub in mapping.values() {
                check_references(sub)?;
            }
        }
    }
    if let Some(AdditionalProperties::Schema(sub)) = &schema.additional_properties {
        check_references(sub)?;
    }
    for sequence in [&schema.all_of, &schema.any_of, &schema.one_of] {
        if let Some(sequence) = sequence {
            for sub in sequence {
                check_references(sub)?;
            }
        }
    }
    if let Some(sub) = &schema.not {
        check_references(sub)?;
    }
    Ok(())
}
