//! The Draft 4 schema record.
//!
//! Every keyword is an optional field so that presence and absence survive
//! a round trip: a schema that omits `minItems` serializes without it, not
//! as `"minItems":0`. Construction, deep copy (`Clone`), and structural
//! equality (`PartialEq`) are the only behaviors; the reader, writer,
//! collapse engine, and validator all operate on this record from outside.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::schema::uri::UriOrFragment;

/// One of the seven JSON type tags a `type` keyword may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimpleType {
    Null,
    Boolean,
    Integer,
    Number,
    String,
    Array,
    Object,
}

impl SimpleType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Null => "Null",
            Self::Boolean => "Boolean",
            Self::Integer => "Integer",
            Self::Number => "Number",
            Self::String => "String",
            Self::Array => "Array",
            Self::Object => "Object",
        }
    }
}

impl fmt::Display for SimpleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The `items` keyword: one schema for every element, or one schema per
/// position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Items {
    Single(Box<Schema>),
    Tuple(Vec<Schema>),
}

/// The `additionalProperties` keyword: a permission flag or a schema for
/// extra properties. `Allowed(false)` prohibits extras.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Allowed(bool),
    Schema(Box<Schema>),
}

/// A JSON Schema Draft 4 schema.
///
/// Wire names are camelCase; `$schema` and `$ref` map to `schema_version`
/// and `reference`. Keywords outside this set are ignored on read.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    /// Identifier that alters resolution scope for descendants
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<UriOrFragment>,

    /// The `$schema` URI, stored but not enforced
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<String>,

    /// Short display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Longer prose description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Ordered type tags. A single-element list serializes as a bare
    /// string, anything else as an array.
    #[serde(
        rename = "type",
        default,
        skip_serializing_if = "Option::is_none",
        with = "type_list"
    )]
    pub types: Option<Vec<SimpleType>>,

    /// Literal values the instance must deep-equal one of.
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<serde_json::Value>>,

    /// Element schema, or one schema per position
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Items>,

    /// Named property schemas, insertion order preserved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, Schema>>,

    /// Named sub-schemas addressable via `#/definitions/<name>`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definitions: Option<IndexMap<String, Schema>>,

    /// Regex pattern to schema, applied to property names not covered by
    /// `properties`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern_properties: Option<IndexMap<String, Schema>>,

    /// Property names that must be present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,

    /// Flag or schema governing properties left over after `properties`
    /// and `patternProperties`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<AdditionalProperties>,

    /// Maximum property count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_properties: Option<u64>,

    /// Minimum property count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_properties: Option<u64>,

    /// Maximum string length in characters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,

    /// Minimum string length in characters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,

    /// Maximum array length
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,

    /// Minimum array length
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,

    /// Regex a string instance must match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    /// Semantic format hint, stored but not enforced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Divisor a numeric instance must be a multiple of
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiple_of: Option<f64>,

    /// Upper bound for numeric instances
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,

    /// Lower bound for numeric instances
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,

    /// When true, `maximum` excludes the boundary value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusive_maximum: Option<bool>,

    /// When true, `minimum` excludes the boundary value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusive_minimum: Option<bool>,

    /// When true, array elements must be pairwise distinct
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_items: Option<bool>,

    /// Schemas the instance must match all of
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_of: Option<Vec<Schema>>,

    /// Schemas the instance must match at least one of
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub any_of: Option<Vec<Schema>>,

    /// Schemas the instance must match exactly one of
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<Schema>>,

    /// Schema the instance must not match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not: Option<Box<Schema>>,

    /// The `$ref` value; resolution replaces or merges this node with its
    /// target
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<UriOrFragment>,
}

/// Codec for the `type` keyword: bare string on the wire becomes a
/// one-element list in the model, and a one-element list serializes back
/// to a bare string.
mod type_list {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::SimpleType;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        One(SimpleType),
        Many(Vec<SimpleType>),
    }

    pub fn serialize<S: Serializer>(
        value: &Option<Vec<SimpleType>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value.as_deref() {
            Some([single]) => single.serialize(serializer),
            Some(many) => many.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Vec<SimpleType>>, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::One(tag) => Ok(Some(vec![tag])),
            Repr::Many(tags) => Ok(Some(tags)),
        }
    }
}
