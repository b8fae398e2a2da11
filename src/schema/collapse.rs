//! Inline `$ref` targets into their referring nodes.
//!
//! The collapse walk visits `items`, every `properties` value, every
//! `definitions` value, and a schema-valued `additionalProperties`. A node
//! carrying a reference is merged with its definition target: the scalar
//! constraint fields and `items` are copied over, while `properties`,
//! `required`, `definitions`, and the combinators of the target are not
//! inlined and the referring node keeps its own values for them.
//! Definitions always resolve against the root schema passed at the top
//! level.

use tracing::debug;

use crate::error::{SchemaError, SchemaResult};
use crate::schema::model::{AdditionalProperties, Items, Schema};
use crate::schema::uri::UriOrFragment;

/// Return a deep clone of `root` with all reachable references resolved
/// in place.
///
/// Fails fast with [`SchemaError::UnsupportedReferenceForm`] on a
/// non-fragment reference and [`SchemaError::DefinitionNotFound`] on a
/// fragment naming a missing definition.
pub fn collapse(root: &Schema) -> SchemaResult<Schema> {
    let mut resolved = root.clone();
    collapse_node(&mut resolved, root)?;
    Ok(resolved)
}

fn collapse_node(node: &mut Schema, root: &Schema) -> SchemaResult<()> {
    if let Some(reference) = node.reference.clone() {
        inline_reference(node, &reference, root)?;
    }
    if let Some(items) = node.items.as_mut() {
        collapse_items(items, root)?;
    }
    if let Some(properties) = node.properties.as_mut() {
        for sub in properties.values_mut() {
            collapse_node(sub, root)?;
        }
    }
    if let Some(definitions) = node.definitions.as_mut() {
        for sub in definitions.values_mut() {
            collapse_node(sub, root)?;
        }
    }
    if let Some(AdditionalProperties::Schema(sub)) = node.additional_properties.as_mut() {
        collapse_node(sub, root)?;
    }
    Ok(())
}

fn collapse_items(items: &mut Items, root: &Schema) -> SchemaResult<()> {
    match items {
        Items::Single(sub) => collapse_node(sub, root),
        Items::Tuple(subs) => {
            for sub in subs {
                collapse_node(sub, root)?;
            }
            Ok(())
        }
    }
}

/// Merge the definition target into the referring node and clear the
/// reference. Copied `items` may still carry references; the caller's
/// walk resolves them.
fn inline_reference(
    node: &mut Schema,
    reference: &UriOrFragment,
    root: &Schema,
) -> SchemaResult<()> {
    if !reference.is_fragment() {
        return Err(SchemaError::UnsupportedReferenceForm {
            reference: reference.as_str().to_string(),
        });
    }
    let name = reference.definition_name()?;
    let definition = root
        .definitions
        .as_ref()
        .and_then(|definitions| definitions.get(name))
        .ok_or_else(|| SchemaError::DefinitionNotFound {
            name: name.to_string(),
        })?;
    debug!(definition = name, "inlining reference");

    node.types = definition.types.clone();
    node.enum_values = definition.enum_values.clone();
    node.items = definition.items.clone();
    node.pattern = definition.pattern.clone();
    node.max_length = definition.max_length;
    node.min_length = definition.min_length;
    node.multiple_of = definition.multiple_of;
    node.maximum = definition.maximum;
    node.exclusive_maximum = definition.exclusive_maximum;
    node.min_items = definition.min_items;
    node.max_items = definition.max_items;
    node.unique_items = definition.unique_items;
    node.format = definition.format.clone();
    node.reference = None;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::model::SimpleType;

    #[test]
    fn inlines_scalar_constraints_from_the_definition() {
        let root = Schema::from_json(
            r##"{
                "properties": {"p": {"$ref": "#/definitions/short"}},
                "definitions": {"short": {"type": "string", "maxLength": 4}}
            }"##,
        )
        .unwrap();

        let resolved = collapse(&root).unwrap();
        let properties = resolved.properties.unwrap();
        let p = &properties["p"];
        assert!(p.reference.is_none());
        assert_eq!(p.types, Some(vec![SimpleType::String]));
        assert_eq!(p.max_length, Some(4));
    }

    #[test]
    fn the_input_schema_is_untouched() {
        let root = Schema::from_json(
            r##"{
                "properties": {"p": {"$ref": "#/definitions/d"}},
                "definitions": {"d": {"type": "integer"}}
            }"##,
        )
        .unwrap();
        let before = root.clone();
        let _ = collapse(&root).unwrap();
        assert_eq!(root, before);
    }

    #[test]
    fn referring_node_keeps_fields_the_merge_does_not_cover() {
        let root = Schema::from_json(
            r##"{
                "properties": {
                    "p": {"$ref": "#/definitions/d", "required": ["x"]}
                },
                "definitions": {
                    "d": {"type": "object", "required": ["y"], "maxLength": 3}
                }
            }"##,
        )
        .unwrap();

        let resolved = collapse(&root).unwrap();
        let properties = resolved.properties.unwrap();
        let p = &properties["p"];
        // required is not in the copied leaf-field set
        assert_eq!(p.required, Some(vec!["x".to_string()]));
        assert_eq!(p.max_length, Some(3));
    }

    #[test]
    fn copied_items_are_collapsed_recursively() {
        let root = Schema::from_json(
            r##"{
                "properties": {"p": {"$ref": "#/definitions/list"}},
                "definitions": {
                    "list": {"type": "array", "items": {"$ref": "#/definitions/element"}},
                    "element": {"type": "number", "maximum": 9}
                }
            }"##,
        )
        .unwrap();

        let resolved = collapse(&root).unwrap();
        let properties = resolved.properties.unwrap();
        let p = &properties["p"];
        match p.items.as_ref().unwrap() {
            Items::Single(element) => {
                assert!(element.reference.is_none());
                assert_eq!(element.maximum, Some(9.0));
            }
            other => panic!("expected single item schema, got {:?}", other),
        }
    }

    #[test]
    fn rejects_non_fragment_references() {
        let root =
            Schema::from_json(r#"{"properties":{"p":{"$ref":"http://example.com/s.json"}}}"#)
                .unwrap();
        assert!(matches!(
            collapse(&root),
            Err(SchemaError::UnsupportedReferenceForm { .. })
        ));
    }

    #[test]
    fn rejects_missing_definitions() {
        let root = Schema::from_json(
            r##"{"properties":{"p":{"$ref":"#/definitions/nowhere"}},"definitions":{}}"##,
        )
        .unwrap();
        assert!(matches!(
            collapse(&root),
            Err(SchemaError::DefinitionNotFound { .. })
        ));
    }

    #[test]
    fn definitions_resolve_against_the_root_not_the_subtree() {
        let root = Schema::from_json(
            r##"{
                "properties": {
                    "outer": {
                        "definitions": {"d": {"type": "string"}},
                        "properties": {"inner": {"$ref": "#/definitions/d"}}
                    }
                },
                "definitions": {"d": {"type": "integer"}}
            }"##,
        )
        .unwrap();

        let resolved = collapse(&root).unwrap();
        let properties = resolved.properties.unwrap();
        let inner = &properties["outer"].properties.as_ref().unwrap()["inner"];
        assert_eq!(inner.types, Some(vec![SimpleType::Integer]));
    }
}
