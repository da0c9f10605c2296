//! Instance document binder
//!
//! An instance document lists flat record layouts: components, each with
//! named fields carrying a declared byte size and an engine type name. The
//! binder resolves every field against a loaded metaschema registry and
//! validates declared sizes against the metaschema's expected sizes.
//! Per-field overrides claimed by the metaschema (or any of its ancestors)
//! take precedence and are exempt from size validation.

use tracing::debug;

use indexmap::IndexMap;

use crate::catalog::SchemaCatalog;
use crate::error::{Result, SchemaError};
use crate::tree::Element;
use crate::types::TypeRef;

/// One resolved field of a bound component
#[derive(Debug, Clone)]
pub struct BoundField {
    pub name: String,
    pub declared_size: u32,
    pub ty: TypeRef,
}

/// One record layout with its fields in document order
#[derive(Debug, Clone)]
pub struct BoundComponent {
    pub name: String,
    pub fields: Vec<BoundField>,
}

/// The result of binding an instance document against a metaschema
#[derive(Debug, Clone)]
pub struct InstanceSchema {
    metaschema_id: String,
    components: IndexMap<String, BoundComponent>,
}

impl InstanceSchema {
    /// Id of the metaschema the instance was bound against
    pub fn metaschema_id(&self) -> &str {
        &self.metaschema_id
    }

    pub fn get(&self, kind: &str) -> Option<&BoundComponent> {
        self.components.get(kind)
    }

    /// Bound components in document order
    pub fn components(&self) -> impl Iterator<Item = &BoundComponent> {
        self.components.values()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

/// Bind an instance document against the metaschema registered under
/// `metaschema_id`, resolving and size-checking every field
pub fn bind_instance(
    catalog: &SchemaCatalog,
    metaschema_id: &str,
    root: &Element,
) -> Result<InstanceSchema> {
    let metaschema = catalog
        .get(metaschema_id)
        .ok_or_else(|| SchemaError::UnknownSchema {
            id: metaschema_id.to_string(),
        })?;

    if root.tag != "Schema" {
        return Err(SchemaError::UnexpectedRoot {
            expected: "Schema",
            found: root.tag.clone(),
        });
    }

    let mut components = IndexMap::new();

    for child in &root.children {
        let component_name = child.require("component_name")?;
        let mut fields = Vec::with_capacity(child.children.len());

        for var in &child.children {
            let field_name = var.require("name")?;
            let raw_size = var.require("size")?;
            let declared_size: u32 =
                raw_size.parse().map_err(|_| SchemaError::InvalidAttribute {
                    element: var.tag.clone(),
                    attribute: "size".to_string(),
                    value: raw_size.to_string(),
                })?;

            // An override claims the field outright, size check and all
            let ty = match metaschema.get_override(catalog, component_name, field_name)? {
                Some(override_type) => override_type,
                None => {
                    let type_name = var.require("type")?.trim();
                    let field_type = metaschema.get_type(catalog, type_name)?;
                    let expected = field_type.expected_size().unwrap_or(0);
                    if expected != declared_size {
                        return Err(SchemaError::SizeMismatch {
                            type_name: field_type.name().to_string(),
                            field: field_name.to_string(),
                            component: component_name.to_string(),
                            expected,
                            actual: declared_size,
                        });
                    }
                    field_type
                }
            };

            fields.push(BoundField {
                name: field_name.to_string(),
                declared_size,
                ty,
            });
        }

        components.insert(
            component_name.to_string(),
            BoundComponent {
                name: component_name.to_string(),
                fields,
            },
        );
    }

    debug!(
        metaschema = %metaschema_id,
        components = components.len(),
        "bound instance document"
    );

    Ok(InstanceSchema {
        metaschema_id: metaschema_id.to_string(),
        components,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_document;

    fn sized_primitive(name: &str, scalar: &str, size: &str) -> Element {
        Element::new("Primitive")
            .attr("name", name)
            .attr("type", scalar)
            .attr("size", size)
    }

    fn metaschema_catalog() -> SchemaCatalog {
        let mut catalog = SchemaCatalog::new();
        let doc = Element::new("Schema")
            .attr("id", "ecs")
            .attr("sized", "1")
            .child(sized_primitive("int", "int", "4"))
            .child(sized_primitive("float", "float", "4"))
            .child(sized_primitive("double", "double", "8"))
            .child(
                Element::new("Object")
                    .attr("name", "LensValue<int>")
                    .attr("size", "12")
                    .child(Element::new("field").attr("name", "value").attr("predef", "int")),
            )
            .child(
                Element::new("SchemaOverrides").child(
                    Element::new("Override")
                        .attr("component", "AudioComponent")
                        .attr("var", "volume")
                        .attr("override_type", "double"),
                ),
            );
        load_document(&mut catalog, &doc).unwrap();
        catalog
    }

    fn var(name: &str, size: &str, type_name: &str) -> Element {
        Element::new("var")
            .attr("name", name)
            .attr("size", size)
            .attr("type", type_name)
    }

    #[test]
    fn test_bind_resolves_types_and_sizes() {
        let catalog = metaschema_catalog();
        let instance = Element::new("Schema").child(
            Element::new("component")
                .attr("component_name", "TransformComponent")
                .child(var("x", "4", "float"))
                .child(var("y", "4", "float"))
                .child(var("frames", "4", "int")),
        );

        let bound = bind_instance(&catalog, "ecs", &instance).unwrap();
        assert_eq!(bound.metaschema_id(), "ecs");
        assert_eq!(bound.len(), 1);

        let component = bound.get("TransformComponent").unwrap();
        assert_eq!(component.name, "TransformComponent");
        let names: Vec<_> = component.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["x", "y", "frames"]);
        assert_eq!(component.fields[0].ty.name(), "float");
        assert_eq!(component.fields[0].declared_size, 4);
        assert_eq!(component.fields[2].ty.name(), "int");
    }

    #[test]
    fn test_type_attribute_is_trimmed() {
        let catalog = metaschema_catalog();
        let instance = Element::new("Schema").child(
            Element::new("component")
                .attr("component_name", "TransformComponent")
                .child(var("x", "4", " float ")),
        );

        let bound = bind_instance(&catalog, "ecs", &instance).unwrap();
        assert_eq!(
            bound.get("TransformComponent").unwrap().fields[0].ty.name(),
            "float"
        );
    }

    #[test]
    fn test_bracketed_type_names_resolve() {
        let catalog = metaschema_catalog();
        let instance = Element::new("Schema").child(
            Element::new("component")
                .attr("component_name", "StatsComponent")
                .child(var("score", "12", "LensValue[int]")),
        );

        let bound = bind_instance(&catalog, "ecs", &instance).unwrap();
        assert_eq!(
            bound.get("StatsComponent").unwrap().fields[0].ty.name(),
            "LensValue<int>"
        );
    }

    #[test]
    fn test_size_mismatch_carries_full_context() {
        let catalog = metaschema_catalog();
        let instance = Element::new("Schema").child(
            Element::new("component")
                .attr("component_name", "TransformComponent")
                .child(var("x", "8", "float")),
        );

        match bind_instance(&catalog, "ecs", &instance) {
            Err(SchemaError::SizeMismatch {
                type_name,
                field,
                component,
                expected,
                actual,
            }) => {
                assert_eq!(type_name, "float");
                assert_eq!(field, "x");
                assert_eq!(component, "TransformComponent");
                assert_eq!(expected, 4);
                assert_eq!(actual, 8);
            }
            other => panic!("Expected SizeMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_size_mismatch_message_format() {
        let catalog = metaschema_catalog();
        let instance = Element::new("Schema").child(
            Element::new("component")
                .attr("component_name", "TransformComponent")
                .child(var("x", "8", "float")),
        );

        let err = bind_instance(&catalog, "ecs", &instance).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Type size mismatch: metaschema-defined type 'float' expects size to be 4, \
             but actual size of field 'x' in component 'TransformComponent' is 8"
        );
    }

    #[test]
    fn test_override_skips_size_check() {
        let catalog = metaschema_catalog();
        // double expects 8, but the override claims the field outright
        let instance = Element::new("Schema").child(
            Element::new("component")
                .attr("component_name", "AudioComponent")
                .child(var("volume", "2", "int")),
        );

        let bound = bind_instance(&catalog, "ecs", &instance).unwrap();
        let field = &bound.get("AudioComponent").unwrap().fields[0];
        assert_eq!(field.ty.name(), "double");
        assert_eq!(field.declared_size, 2);
    }

    #[test]
    fn test_overridden_field_does_not_need_a_type_attribute() {
        let catalog = metaschema_catalog();
        let instance = Element::new("Schema").child(
            Element::new("component")
                .attr("component_name", "AudioComponent")
                .child(Element::new("var").attr("name", "volume").attr("size", "2")),
        );

        let bound = bind_instance(&catalog, "ecs", &instance).unwrap();
        assert_eq!(
            bound.get("AudioComponent").unwrap().fields[0].ty.name(),
            "double"
        );
    }

    #[test]
    fn test_ancestor_override_applies() {
        let mut catalog = metaschema_catalog();
        let game = Element::new("Schema").attr("id", "game").attr("inherit", "ecs");
        load_document(&mut catalog, &game).unwrap();

        let instance = Element::new("Schema").child(
            Element::new("component")
                .attr("component_name", "AudioComponent")
                .child(var("volume", "2", "int")),
        );

        let bound = bind_instance(&catalog, "game", &instance).unwrap();
        assert_eq!(
            bound.get("AudioComponent").unwrap().fields[0].ty.name(),
            "double"
        );
    }

    #[test]
    fn test_unknown_metaschema() {
        let catalog = SchemaCatalog::new();
        let instance = Element::new("Schema");

        match bind_instance(&catalog, "ecs", &instance) {
            Err(SchemaError::UnknownSchema { id }) => assert_eq!(id, "ecs"),
            other => panic!("Expected UnknownSchema, got {:?}", other),
        }
    }

    #[test]
    fn test_unexpected_root() {
        let catalog = metaschema_catalog();
        let instance = Element::new("Layout");

        match bind_instance(&catalog, "ecs", &instance) {
            Err(SchemaError::UnexpectedRoot { expected, found }) => {
                assert_eq!(expected, "Schema");
                assert_eq!(found, "Layout");
            }
            other => panic!("Expected UnexpectedRoot, got {:?}", other),
        }
    }

    #[test]
    fn test_unregistered_type() {
        let catalog = metaschema_catalog();
        let instance = Element::new("Schema").child(
            Element::new("component")
                .attr("component_name", "PhysicsComponent")
                .child(var("body", "16", "b2Body")),
        );

        match bind_instance(&catalog, "ecs", &instance) {
            Err(SchemaError::UnregisteredType { name }) => assert_eq!(name, "b2Body"),
            other => panic!("Expected UnregisteredType, got {:?}", other),
        }
    }

    #[test]
    fn test_size_attribute_is_required() {
        let catalog = metaschema_catalog();
        let instance = Element::new("Schema").child(
            Element::new("component")
                .attr("component_name", "TransformComponent")
                .child(Element::new("var").attr("name", "x").attr("type", "float")),
        );

        match bind_instance(&catalog, "ecs", &instance) {
            Err(SchemaError::MissingAttribute { attribute, .. }) => assert_eq!(attribute, "size"),
            other => panic!("Expected MissingAttribute, got {:?}", other),
        }
    }

    #[test]
    fn test_type_without_expected_size_counts_as_zero() {
        let mut catalog = SchemaCatalog::new();
        // Not a sized registry, so no type carries an expected size
        let doc = Element::new("Schema")
            .attr("id", "ecs")
            .child(Element::new("Primitive").attr("name", "int").attr("type", "int"));
        load_document(&mut catalog, &doc).unwrap();

        let zero = Element::new("Schema").child(
            Element::new("component")
                .attr("component_name", "C")
                .child(var("a", "0", "int")),
        );
        assert!(bind_instance(&catalog, "ecs", &zero).is_ok());

        let nonzero = Element::new("Schema").child(
            Element::new("component")
                .attr("component_name", "C")
                .child(var("a", "4", "int")),
        );
        match bind_instance(&catalog, "ecs", &nonzero) {
            Err(SchemaError::SizeMismatch { expected, actual, .. }) => {
                assert_eq!(expected, 0);
                assert_eq!(actual, 4);
            }
            other => panic!("Expected SizeMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_component_order_is_preserved() {
        let catalog = metaschema_catalog();
        let instance = Element::new("Schema")
            .child(Element::new("component").attr("component_name", "B"))
            .child(Element::new("component").attr("component_name", "A"))
            .child(Element::new("component").attr("component_name", "C"));

        let bound = bind_instance(&catalog, "ecs", &instance).unwrap();
        let names: Vec<_> = bound.components().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A", "C"]);
    }
}
