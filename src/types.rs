//! Schema type model
//!
//! Every declared type is a [`SchemaType`]: shared metadata (name, expected
//! size, display name) wrapped around one of four categories. Registered
//! types are shared as [`TypeRef`]s, so an alias and its target are the same
//! allocation and compare equal by pointer.

use std::borrow::Cow;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::{Result, SchemaError};

/// Shared handle to a registered type
pub type TypeRef = Arc<SchemaType>;

/// Canonical spelling for type names: bracket generics fold to angle
/// brackets, so `vector[int]` and `vector<int>` name the same type
pub fn normalize_type_name(name: &str) -> Cow<'_, str> {
    if name.contains(|c| c == '[' || c == ']') {
        Cow::Owned(name.replace('[', "<").replace(']', ">"))
    } else {
        Cow::Borrowed(name)
    }
}

/// Scalar kinds a Primitive type can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Int32,
    UInt32,
    Bool,
    Float32,
    Float64,
    Str,
    Byte,
}

impl ScalarKind {
    /// Parse one of the seven scalar kind names used by schema documents
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "int" => Some(ScalarKind::Int32),
            "uint" => Some(ScalarKind::UInt32),
            "bool" => Some(ScalarKind::Bool),
            "float" => Some(ScalarKind::Float32),
            "double" => Some(ScalarKind::Float64),
            "string" => Some(ScalarKind::Str),
            "unsigned char" => Some(ScalarKind::Byte),
            _ => None,
        }
    }

    /// The document-facing name of this scalar kind
    pub fn name(&self) -> &'static str {
        match self {
            ScalarKind::Int32 => "int",
            ScalarKind::UInt32 => "uint",
            ScalarKind::Bool => "bool",
            ScalarKind::Float32 => "float",
            ScalarKind::Float64 => "double",
            ScalarKind::Str => "string",
            ScalarKind::Byte => "unsigned char",
        }
    }
}

/// The four type categories
#[derive(Debug, Clone)]
pub enum TypeKind {
    /// A single scalar value serialized as one attribute
    Primitive { scalar: ScalarKind },
    /// Named fields serialized as child nodes
    Object {
        fields: IndexMap<String, TypeRef>,
        array: bool,
    },
    /// Named sub-attributes serialized dot-separated on one node; every
    /// sub-attribute type is a Primitive
    MultiAttr { fields: IndexMap<String, TypeRef> },
    /// Repeated entries under a named child node
    List {
        entry_name: String,
        fields: IndexMap<String, TypeRef>,
        array: bool,
    },
}

impl TypeKind {
    /// Category label for error messages and listings
    pub fn category(&self) -> &'static str {
        match self {
            TypeKind::Primitive { .. } => "Primitive",
            TypeKind::Object { .. } => "Object",
            TypeKind::MultiAttr { .. } => "MultiAttr",
            TypeKind::List { .. } => "List",
        }
    }
}

/// A declared type: category payload plus shared metadata
#[derive(Debug, Clone)]
pub struct SchemaType {
    name: String,
    nice_name: Option<String>,
    expected_size: Option<u32>,
    unknown: bool,
    kind: TypeKind,
}

impl SchemaType {
    /// Create a type. The name is normalized, so bracket and angle spellings
    /// collapse to one canonical registration name.
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        let name = normalize_type_name(&name.into()).into_owned();
        Self {
            name,
            nice_name: None,
            expected_size: None,
            unknown: false,
            kind,
        }
    }

    /// Set the expected serialized size in bytes
    pub fn with_expected_size(mut self, size: u32) -> Self {
        self.expected_size = Some(size);
        self
    }

    /// Set a display name that differs from the registration name
    pub fn with_nice_name(mut self, nice_name: impl Into<String>) -> Self {
        self.nice_name = Some(nice_name.into());
        self
    }

    /// Flag a type that was discovered but never fully defined
    pub fn mark_unknown(mut self) -> Self {
        self.unknown = true;
        self
    }

    /// Turn this type into a field array. Only Object and List types can be
    /// field arrays; any other category fails.
    pub fn into_array(mut self) -> Result<Self> {
        match &mut self.kind {
            TypeKind::Object { array, .. } | TypeKind::List { array, .. } => {
                *array = true;
                Ok(self)
            }
            other => Err(SchemaError::InvalidFieldArrayTarget {
                type_name: self.name.clone(),
                category: other.category(),
            }),
        }
    }

    /// Registration name (normalized)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display name, falling back to the registration name
    pub fn nice_name(&self) -> &str {
        self.nice_name.as_deref().unwrap_or(&self.name)
    }

    /// Expected serialized size, when the owning registry declares sizes
    pub fn expected_size(&self) -> Option<u32> {
        self.expected_size
    }

    /// Whether this type was discovered but never fully defined
    pub fn is_unknown(&self) -> bool {
        self.unknown
    }

    /// Category payload
    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    /// Category label
    pub fn category(&self) -> &'static str {
        self.kind.category()
    }

    /// Whether this Object or List type is a field array
    pub fn is_array(&self) -> bool {
        matches!(
            self.kind,
            TypeKind::Object { array: true, .. } | TypeKind::List { array: true, .. }
        )
    }
}
