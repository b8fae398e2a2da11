//! Reference values: absolute URIs, relative URIs, and bare fragments.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{SchemaError, SchemaResult};

const DEFINITIONS_PREFIX: &str = "#/definitions/";

/// The value of an `id` or `$ref` keyword.
///
/// Holds the underlying URI-like string plus a flag marking bare fragments
/// (values starting with `#`). Equality is string-exact; the fragment is
/// part of identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UriOrFragment {
    value: String,
    is_fragment: bool,
}

impl UriOrFragment {
    /// Wrap a reference string, detecting the fragment form.
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let is_fragment = value.starts_with('#');
        Self { value, is_fragment }
    }

    /// Whether this is a bare fragment (`#...`) rather than a URI.
    pub fn is_fragment(&self) -> bool {
        self.is_fragment
    }

    /// The underlying reference string.
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// The definition name a `#/definitions/<name>` fragment points at.
    pub fn definition_name(&self) -> SchemaResult<&str> {
        self.value
            .strip_prefix(DEFINITIONS_PREFIX)
            .ok_or_else(|| SchemaError::InvalidReferenceForm {
                reference: self.value.clone(),
            })
    }
}

impl fmt::Display for UriOrFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl Serialize for UriOrFragment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.value)
    }
}

impl<'de> Deserialize<'de> for UriOrFragment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(UriOrFragment::new(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_fragments() {
        assert!(UriOrFragment::new("#/definitions/address").is_fragment());
        assert!(!UriOrFragment::new("http://example.com/schema.json").is_fragment());
        assert!(!UriOrFragment::new("other.json#/definitions/x").is_fragment());
    }

    #[test]
    fn definition_name_strips_prefix() {
        let reference = UriOrFragment::new("#/definitions/address");
        assert_eq!(reference.definition_name().unwrap(), "address");
    }

    #[test]
    fn definition_name_rejects_other_fragments() {
        let reference = UriOrFragment::new("#/properties/a");
        assert!(matches!(
            reference.definition_name(),
            Err(SchemaError::InvalidReferenceForm { .. })
        ));
    }

    #[test]
    fn equality_is_string_exact() {
        assert_eq!(
            UriOrFragment::new("#/definitions/a"),
            UriOrFragment::new("#/definitions/a")
        );
        assert_ne!(
            UriOrFragment::new("#/definitions/a"),
            UriOrFragment::new("#/definitions/b")
        );
    }

    #[test]
    fn round_trips_as_a_json_string() {
        let reference = UriOrFragment::new("#/definitions/a");
        let json = serde_json::to_string(&reference).unwrap();
        assert_eq!(json, "\"#/definitions/a\"");
        let back: UriOrFragment = serde_json::from_str(&json).unwrap();
        assert_eq!(back, reference);
    }
}
