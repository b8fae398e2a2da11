//! Equality and hashing classification for the data-class generator.
//!
//! The generator asks, per property of a generated class, how the emitted
//! equality comparer and hash code should treat the value. The answer is a
//! pair of kinds derived from the property's schema.

use serde::{Deserialize, Serialize};

use crate::schema::model::{AdditionalProperties, Schema, SimpleType};

/// How generated equality code compares a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComparisonKind {
    /// Value scalars compare with the equality operator.
    OperatorEquals,
    /// Reference scalars compare through the general object-equals helper.
    ObjectEquals,
    /// User-defined types compare through their dedicated comparer.
    EqualityComparerEquals,
    /// Ordered containers compare element-wise after a length check.
    Collection,
    /// Mappings compare by key set, then per-key values.
    Dictionary,
}

/// How generated code hashes a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HashKind {
    ScalarValueType,
    ScalarReferenceType,
    Collection,
    Dictionary,
}

/// Seed for the commutative dictionary hash.
pub const DICTIONARY_HASH_SEED: i32 = 17;

/// Multiplier for the commutative dictionary hash.
pub const DICTIONARY_HASH_MULTIPLIER: i32 = 31;

/// Classify how a property with this schema is compared.
pub fn comparison_kind(schema: &Schema) -> ComparisonKind {
    if schema.reference.is_some() {
        return ComparisonKind::EqualityComparerEquals;
    }
    match primary_type(schema) {
        Some(SimpleType::Boolean | SimpleType::Integer | SimpleType::Number) => {
            ComparisonKind::OperatorEquals
        }
        Some(SimpleType::Array) => ComparisonKind::Collection,
        Some(SimpleType::Object) => {
            if is_dictionary_shaped(schema) {
                ComparisonKind::Dictionary
            } else {
                ComparisonKind::EqualityComparerEquals
            }
        }
        Some(SimpleType::String | SimpleType::Null) | None => ComparisonKind::ObjectEquals,
    }
}

/// Classify how a property with this schema is hashed.
pub fn hash_kind(schema: &Schema) -> HashKind {
    if schema.reference.is_some() {
        return HashKind::ScalarReferenceType;
    }
    match primary_type(schema) {
        Some(SimpleType::Boolean | SimpleType::Integer | SimpleType::Number) => {
            HashKind::ScalarValueType
        }
        Some(SimpleType::Array) => HashKind::Collection,
        Some(SimpleType::Object) => {
            if is_dictionary_shaped(schema) {
                HashKind::Dictionary
            } else {
                HashKind::ScalarReferenceType
            }
        }
        Some(SimpleType::String | SimpleType::Null) | None => HashKind::ScalarReferenceType,
    }
}

/// Commutative hash over key/value hash pairs, as emitted into generated
/// dictionary comparers: each pair folds into seed and multiplier, the
/// pair hashes combine by XOR so enumeration order cannot matter.
pub fn dictionary_hash(pairs: impl IntoIterator<Item = (i32, i32)>) -> i32 {
    let mut hash = 0i32;
    for (key_hash, value_hash) in pairs {
        let mut pair = DICTIONARY_HASH_SEED;
        pair = pair
            .wrapping_mul(DICTIONARY_HASH_MULTIPLIER)
            .wrapping_add(key_hash);
        pair = pair
            .wrapping_mul(DICTIONARY_HASH_MULTIPLIER)
            .wrapping_add(value_hash);
        hash ^= pair;
    }
    hash
}

fn primary_type(schema: &Schema) -> Option<SimpleType> {
    schema.types.as_ref().and_then(|types| types.first().copied())
}

/// An object schema with no named properties and a schema-valued
/// `additionalProperties` maps to a dictionary type.
fn is_dictionary_shaped(schema: &Schema) -> bool {
    schema.properties.is_none()
        && matches!(
            schema.additional_properties,
            Some(AdditionalProperties::Schema(_))
        )
}
