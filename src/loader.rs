//! Schema document loader
//!
//! A document is consumed in a single forward pass: root attributes first,
//! then each child in order. Every `predef` reference must already be
//! resolvable, either from earlier in the same document or from an ancestor
//! registry, so documents are loaded in dependency order. The new registry
//! becomes visible in the catalog only once the whole document has been
//! processed.

use std::fs;
use std::path::Path;

use tracing::debug;

use indexmap::IndexMap;

use crate::catalog::SchemaCatalog;
use crate::error::{Result, SchemaError};
use crate::fingerprint::Fingerprint;
use crate::schema::Schema;
use crate::tree::Element;
use crate::types::{normalize_type_name, ScalarKind, SchemaType, TypeKind, TypeRef};

/// Load a schema document into the catalog, returning the new registry's id
pub fn load_document(catalog: &mut SchemaCatalog, root: &Element) -> Result<String> {
    load_inner(catalog, root, None)
}

/// Load a schema document under an explicitly supplied parent, ignoring any
/// `inherit` attribute on the root. The parent must already be loaded.
pub fn load_document_with_parent(
    catalog: &mut SchemaCatalog,
    root: &Element,
    parent_id: &str,
) -> Result<String> {
    load_inner(catalog, root, Some(parent_id))
}

fn load_inner(
    catalog: &mut SchemaCatalog,
    root: &Element,
    explicit_parent: Option<&str>,
) -> Result<String> {
    let id = root.require("id")?.to_string();

    let parent_id = match explicit_parent {
        Some(parent_id) => Some(parent_id.to_string()),
        None => root.get("inherit").map(str::to_string),
    };
    if let Some(parent_id) = &parent_id {
        match catalog.get(parent_id) {
            Some(parent) if parent.id() == parent_id.as_str() => {}
            _ => {
                return Err(SchemaError::MissingParent {
                    schema_id: id,
                    parent_id: parent_id.clone(),
                })
            }
        }
    }

    let sized = root.get_bool("sized") == Some(true);

    if catalog.contains(&id) {
        return Err(SchemaError::DuplicateSchemaId { id });
    }

    let mut schema = Schema::new(id.clone())
        .with_sized(sized)
        .with_fingerprint(Fingerprint::of_document(root));
    if let Some(parent_id) = parent_id {
        schema = schema.with_parent(parent_id);
    }

    for child in &root.children {
        match child.tag.as_str() {
            "SchemaOverrides" => {
                for entry in &child.children {
                    let record_kind = entry.require("component")?;
                    let field = entry.require("var")?;
                    let type_name = entry.require("override_type")?;
                    schema.add_override(record_kind, field, type_name);
                }
            }
            "Alias" => {
                let name = child.require("name")?;
                let target = schema.get_type(catalog, child.require("alias")?)?;
                schema.add_alias(name, target);
            }
            _ => {
                let ty = load_type_def(catalog, &schema, child, sized)?;
                schema.add_type(ty);
            }
        }
    }

    debug!(id = %id, types = schema.len(), sized, "loaded schema document");
    catalog.insert(schema)?;
    Ok(id)
}

/// Construct one declared type from a type-defining element
fn load_type_def(
    catalog: &SchemaCatalog,
    schema: &Schema,
    child: &Element,
    sized: bool,
) -> Result<SchemaType> {
    let name = child.require("name")?;

    // A FieldArray element names its underlying category in `class`
    let (tag, field_array) = match child.tag.as_str() {
        "FieldArray" => (child.require("class")?, true),
        tag => (tag, false),
    };

    let kind = match tag {
        "Primitive" => {
            let scalar_name = child.require("type")?;
            let scalar = ScalarKind::parse(scalar_name).ok_or_else(|| {
                SchemaError::UnknownScalarKind {
                    name: scalar_name.to_string(),
                }
            })?;
            TypeKind::Primitive { scalar }
        }
        "MultiAttr" => TypeKind::MultiAttr {
            fields: sub_attr_fields(catalog, schema, child, name)?,
        },
        "Object" => TypeKind::Object {
            fields: predef_fields(catalog, schema, child)?,
            array: false,
        },
        "List" => TypeKind::List {
            entry_name: child.require("entry_name")?.to_string(),
            fields: predef_fields(catalog, schema, child)?,
            array: false,
        },
        other => {
            return Err(SchemaError::UnknownTypeDefinition {
                tag: other.to_string(),
            })
        }
    };

    let mut ty = SchemaType::new(name, kind);

    if sized {
        let Some(raw) = child.get("size") else {
            return Err(SchemaError::MissingSizeAttribute {
                type_name: ty.name().to_string(),
            });
        };
        let size: u32 = raw.parse().map_err(|_| SchemaError::InvalidAttribute {
            element: child.tag.clone(),
            attribute: "size".to_string(),
            value: raw.to_string(),
        })?;
        ty = ty.with_expected_size(size);
    }

    if let Some(nice_name) = child.get("nice_name") {
        ty = ty.with_nice_name(nice_name);
    }

    if field_array {
        ty = ty.into_array()?;
    }

    Ok(ty)
}

/// Resolve the `name`/`predef` field children of an Object or List element
fn predef_fields(
    catalog: &SchemaCatalog,
    schema: &Schema,
    typedef: &Element,
) -> Result<IndexMap<String, TypeRef>> {
    let mut fields = IndexMap::new();
    for field in &typedef.children {
        let name = field.require("name")?;
        let ty = schema.get_type(catalog, field.require("predef")?)?;
        fields.insert(name.to_string(), ty);
    }
    Ok(fields)
}

/// Like [`predef_fields`], but every sub-attribute must be a Primitive
fn sub_attr_fields(
    catalog: &SchemaCatalog,
    schema: &Schema,
    typedef: &Element,
    type_name: &str,
) -> Result<IndexMap<String, TypeRef>> {
    let mut fields = IndexMap::new();
    for field in &typedef.children {
        let name = field.require("name")?;
        let ty = schema.get_type(catalog, field.require("predef")?)?;
        if !matches!(ty.kind(), TypeKind::Primitive { .. }) {
            return Err(SchemaError::NonPrimitiveSubAttribute {
                type_name: normalize_type_name(type_name).into_owned(),
                field: name.to_string(),
                found: ty.category(),
            });
        }
        fields.insert(name.to_string(), ty);
    }
    Ok(fields)
}

// ----------------------------------------------------------------------
// File loading
// ----------------------------------------------------------------------

/// Read an element tree from a JSON document file
pub fn read_document(path: &Path) -> anyhow::Result<Element> {
    let content = fs::read_to_string(path)?;
    let root: Element = serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse JSON in {}: {}", path.display(), e))?;
    Ok(root)
}

/// Load a schema document file into the catalog, returning the new
/// registry's id
pub fn load_file(catalog: &mut SchemaCatalog, path: &Path) -> anyhow::Result<String> {
    let root = read_document(path)?;
    let id = load_document(catalog, &root)
        .map_err(|e| anyhow::anyhow!("Failed to load schema from {}: {}", path.display(), e))?;
    Ok(id)
}
