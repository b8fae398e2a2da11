//! Serialize the schema model back to JSON text.
//!
//! Inverse of the reader: absent fields are omitted, a single-element
//! `type` list becomes a bare string, and the reference field is emitted
//! as `$ref`.

use crate::error::{SchemaError, SchemaResult};
use crate::schema::model::Schema;

impl Schema {
    /// Serialize to compact JSON.
    pub fn to_json(&self) -> SchemaResult<String> {
        serde_json::to_string(self).map_err(|e| SchemaError::MalformedJson(e.to_string()))
    }

    /// Serialize to indented JSON.
    pub fn to_json_pretty(&self) -> SchemaResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| SchemaError::MalformedJson(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use crate::schema::model::{Schema, SimpleType};

    #[test]
    fn the_empty_schema_writes_as_an_empty_object() {
        assert_eq!(Schema::default().to_json().unwrap(), "{}");
    }

    #[test]
    fn absent_bounds_stay_absent() {
        let text = Schema::from_json(r#"{"type":"array"}"#)
            .unwrap()
            .to_json()
            .unwrap();
        assert_eq!(text, r#"{"type":"array"}"#);
        assert!(!text.contains("minItems"));
    }

    #[test]
    fn a_single_type_writes_as_a_bare_string() {
        let schema = Schema {
            types: Some(vec![SimpleType::String]),
            ..Schema::default()
        };
        assert_eq!(schema.to_json().unwrap(), r#"{"type":"string"}"#);
    }

    #[test]
    fn multiple_types_write_as_an_array() {
        let schema = Schema {
            types: Some(vec![SimpleType::String, SimpleType::Null]),
            ..Schema::default()
        };
        assert_eq!(schema.to_json().unwrap(), r#"{"type":["string","null"]}"#);
    }

    #[test]
    fn references_write_as_ref() {
        let text = Schema::from_json(r##"{"$ref":"#/definitions/d"}"##)
            .unwrap()
            .to_json()
            .unwrap();
        assert_eq!(text, r##"{"$ref":"#/definitions/d"}"##);
    }

    #[test]
    fn read_write_read_is_stable() {
        let text = r##"{
            "type": "object",
            "properties": {
                "name": {"type": "string", "minLength": 1},
                "age": {"type": "integer", "minimum": 0}
            },
            "required": ["name"],
            "additionalProperties": false,
            "definitions": {
                "tag": {"enum": ["a", "b", null]}
            }
        }"##;
        let first = Schema::from_json(text).unwrap();
        let written = first.to_json().unwrap();
        let second = Schema::from_json(&written).unwrap();
        assert_eq!(first, second);
    }
}
