//! Integration coverage for the reference collapse engine.

use anyhow::Result;

use draft4::{collapse, Items, Schema, SchemaError, SimpleType, Validator};

#[test]
fn collapsed_schemas_validate_without_a_definitions_lookup() -> Result<()> {
    let root = Schema::from_json(
        r##"{
            "type": "object",
            "properties": {
                "code": {"$ref": "#/definitions/code"},
                "count": {"$ref": "#/definitions/count"}
            },
            "definitions": {
                "code": {"type": "string", "pattern": "^[A-Z]{3}$"},
                "count": {"type": "integer", "maximum": 100}
            }
        }"##,
    )?;

    let resolved = collapse(&root)?;
    let properties = resolved.properties.as_ref().expect("properties");
    assert!(properties["code"].reference.is_none());
    assert_eq!(properties["code"].types, Some(vec![SimpleType::String]));
    assert_eq!(properties["count"].maximum, Some(100.0));

    // The collapsed tree validates the same instances as the original.
    let mut validator = Validator::new(&resolved)?;
    assert!(validator.validate(r#"{"code": "ABC", "count": 5}"#)?.is_empty());
    let messages = validator.validate(r#"{"code": "abc", "count": 500}"#)?;
    assert_eq!(messages.len(), 2);
    Ok(())
}

#[test]
fn chained_item_references_collapse_to_leaves() -> Result<()> {
    let root = Schema::from_json(
        r##"{
            "items": {"$ref": "#/definitions/row"},
            "definitions": {
                "row": {"type": "array", "items": {"$ref": "#/definitions/cell"}, "minItems": 1},
                "cell": {"type": "number", "multipleOf": 0.5}
            }
        }"##,
    )?;

    let resolved = collapse(&root)?;
    let Some(Items::Single(row)) = resolved.items.as_ref() else {
        panic!("expected single item schema");
    };
    assert_eq!(row.min_items, Some(1));
    let Some(Items::Single(cell)) = row.items.as_ref() else {
        panic!("expected nested item schema");
    };
    assert_eq!(cell.multiple_of, Some(0.5));
    assert!(cell.reference.is_none());
    Ok(())
}

#[test]
fn collapse_fails_fast_on_the_first_bad_reference() -> Result<()> {
    let root = Schema::from_json(
        r##"{
            "properties": {
                "a": {"$ref": "#/definitions/missing"},
                "b": {"$ref": "#/definitions/present"}
            },
            "definitions": {"present": {"type": "null"}}
        }"##,
    )?;

    match collapse(&root) {
        Err(SchemaError::DefinitionNotFound { name }) => assert_eq!(name, "missing"),
        other => panic!("expected DefinitionNotFound, got {:?}", other),
    }
    Ok(())
}

#[test]
fn remote_references_are_unsupported() -> Result<()> {
    let root = Schema::from_json(
        r#"{"items": {"$ref": "http://example.com/other.json"}}"#,
    )?;
    match collapse(&root) {
        Err(SchemaError::UnsupportedReferenceForm { reference }) => {
            assert_eq!(reference, "http://example.com/other.json");
        }
        other => panic!("expected UnsupportedReferenceForm, got {:?}", other),
    }
    Ok(())
}

#[test]
fn a_schema_without_references_collapses_to_itself() -> Result<()> {
    let root = Schema::from_json(
        r#"{
            "type": "object",
            "properties": {"a": {"type": "string"}},
            "additionalProperties": {"type": "integer"}
        }"#,
    )?;
    assert_eq!(collapse(&root)?, root);
    Ok(())
}
