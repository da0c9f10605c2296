//! Error types for schema loading, resolution, and binding

use thiserror::Error;

/// Result type for schema operations
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Schema catalog errors
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Schema with id '{id}' is already loaded")]
    DuplicateSchemaId { id: String },

    #[error("Missing (or mismatched) parent '{parent_id}' for schema '{schema_id}'")]
    MissingParent { schema_id: String, parent_id: String },

    #[error("No schema with the id '{id}' is loaded")]
    UnknownSchema { id: String },

    #[error("Type '{name}' has not been registered")]
    UnregisteredType { name: String },

    #[error("Missing 'size' attribute on schema type '{type_name}'")]
    MissingSizeAttribute { type_name: String },

    #[error("FieldArray can only be used with Object and List types, got {category} '{type_name}'")]
    InvalidFieldArrayTarget { type_name: String, category: &'static str },

    #[error("Type size mismatch: metaschema-defined type '{type_name}' expects size to be {expected}, but actual size of field '{field}' in component '{component}' is {actual}")]
    SizeMismatch {
        type_name: String,
        field: String,
        component: String,
        expected: u32,
        actual: u32,
    },

    #[error("Member line appeared before first component header")]
    MemberBeforeComponent,

    #[error("Missing '{attribute}' attribute on '{element}' element")]
    MissingAttribute { element: String, attribute: String },

    #[error("Invalid value '{value}' for '{attribute}' attribute on '{element}' element")]
    InvalidAttribute {
        element: String,
        attribute: String,
        value: String,
    },

    #[error("Unknown type definition: '{tag}'")]
    UnknownTypeDefinition { tag: String },

    #[error("Unknown primitive type name: '{name}'")]
    UnknownScalarKind { name: String },

    #[error("Sub-attribute '{field}' of multi-attribute type '{type_name}' must resolve to a primitive, got {found}")]
    NonPrimitiveSubAttribute {
        type_name: String,
        field: String,
        found: &'static str,
    },

    #[error("Expected a '{expected}' root element, found '{found}'")]
    UnexpectedRoot { expected: &'static str, found: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
