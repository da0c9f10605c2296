//! Loaded schema registries
//!
//! A [`Schema`] is one loaded document: its insertion-ordered type
//! declarations, its per-record-kind field overrides, and its documentation
//! side-table. Parents are held as ids and resolved through the owning
//! [`SchemaCatalog`] at lookup time, so a registry never outlives or pins the
//! registry it inherits from.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use crate::catalog::SchemaCatalog;
use crate::docs::DocTable;
use crate::error::{Result, SchemaError};
use crate::fingerprint::Fingerprint;
use crate::types::{normalize_type_name, SchemaType, TypeRef};

/// One loaded schema registry
#[derive(Debug, Clone)]
pub struct Schema {
    id: String,
    parent_id: Option<String>,
    sized: bool,
    /// Declarations in document order. Alias names map to the same
    /// allocation as their target, so identity survives enumeration.
    types: IndexMap<String, TypeRef>,
    /// record kind -> field name -> overriding type name
    overrides: HashMap<String, HashMap<String, String>>,
    docs: DocTable,
    fingerprint: Option<Fingerprint>,
    loaded_at: DateTime<Utc>,
}

impl Schema {
    /// Create an empty registry
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent_id: None,
            sized: false,
            types: IndexMap::new(),
            overrides: HashMap::new(),
            docs: DocTable::new(),
            fingerprint: None,
            loaded_at: Utc::now(),
        }
    }

    /// Set the parent registry this one inherits from
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// Switch declared-size bookkeeping on or off
    pub fn with_sized(mut self, sized: bool) -> Self {
        self.sized = sized;
        self
    }

    /// Record the fingerprint of the source document
    pub fn with_fingerprint(mut self, fingerprint: Fingerprint) -> Self {
        self.fingerprint = Some(fingerprint);
        self
    }

    /// Registry id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Id of the parent registry, if this one inherits
    pub fn parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }

    /// Whether types in this registry declare serialized sizes
    pub fn is_sized(&self) -> bool {
        self.sized
    }

    /// Fingerprint of the source document, when loaded from one
    pub fn fingerprint(&self) -> Option<&Fingerprint> {
        self.fingerprint.as_ref()
    }

    /// When this registry was constructed
    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    /// Register a type under its own (normalized) name.
    ///
    /// Re-registering a name replaces the value but keeps its original
    /// position in declaration order.
    pub fn add_type(&mut self, ty: SchemaType) -> TypeRef {
        let ty = TypeRef::new(ty);
        self.types.insert(ty.name().to_string(), ty.clone());
        ty
    }

    /// Register an additional name for an already-registered type. No new
    /// type is created; both names resolve to the same allocation.
    pub fn add_alias(&mut self, name: impl Into<String>, target: TypeRef) {
        let name = normalize_type_name(&name.into()).into_owned();
        self.types.insert(name, target);
    }

    /// Record a per-field type override for one record kind
    pub fn add_override(
        &mut self,
        record_kind: impl Into<String>,
        field: impl Into<String>,
        type_name: impl Into<String>,
    ) {
        self.overrides
            .entry(record_kind.into())
            .or_default()
            .insert(field.into(), type_name.into());
    }

    // ------------------------------------------------------------------
    // Resolution
    // ------------------------------------------------------------------

    /// Look up a type in this registry only, without walking ancestors
    pub fn local_type(&self, name: &str) -> Option<&TypeRef> {
        self.types.get(normalize_type_name(name).as_ref())
    }

    /// Resolve a type name through this registry and its ancestors, failing
    /// when the whole chain misses
    pub fn get_type(&self, catalog: &SchemaCatalog, name: &str) -> Result<TypeRef> {
        self.try_get_type(catalog, name)?
            .ok_or_else(|| SchemaError::UnregisteredType {
                name: normalize_type_name(name).into_owned(),
            })
    }

    /// Resolve a type name, distinguishing "absent" from other failures.
    ///
    /// Returns `Ok(None)` only when this registry has no parent and no local
    /// entry. When a parent exists, the miss is delegated to the parent's
    /// *strict* resolver, so a full-chain miss surfaces as
    /// [`SchemaError::UnregisteredType`] rather than `None`; callers rely on
    /// that hard failure for ancestor resolution.
    pub fn try_get_type(&self, catalog: &SchemaCatalog, name: &str) -> Result<Option<TypeRef>> {
        if let Some(ty) = self.local_type(name) {
            return Ok(Some(ty.clone()));
        }
        match &self.parent_id {
            Some(parent_id) => self
                .parent(catalog, parent_id)?
                .get_type(catalog, name)
                .map(Some),
            None => Ok(None),
        }
    }

    /// Resolve the overriding type for one field of a record kind, walking
    /// ancestors until an override table claims the field.
    ///
    /// The override's type name resolves from the registry where the
    /// override was found, and a name that fails to resolve there is a hard
    /// error even though the override lookup itself is optional.
    pub fn get_override(
        &self,
        catalog: &SchemaCatalog,
        record_kind: &str,
        field: &str,
    ) -> Result<Option<TypeRef>> {
        if let Some(type_name) = self
            .overrides
            .get(record_kind)
            .and_then(|fields| fields.get(field))
        {
            return self.get_type(catalog, type_name).map(Some);
        }
        match &self.parent_id {
            Some(parent_id) => self
                .parent(catalog, parent_id)?
                .get_override(catalog, record_kind, field),
            None => Ok(None),
        }
    }

    fn parent<'a>(&self, catalog: &'a SchemaCatalog, parent_id: &str) -> Result<&'a Schema> {
        catalog
            .get(parent_id)
            .ok_or_else(|| SchemaError::MissingParent {
                schema_id: self.id.clone(),
                parent_id: parent_id.to_string(),
            })
    }

    // ------------------------------------------------------------------
    // Enumeration
    // ------------------------------------------------------------------

    /// Registered names in declaration order (aliases included)
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    /// Registered (name, type) pairs in declaration order
    pub fn types(&self) -> impl Iterator<Item = (&str, &TypeRef)> {
        self.types.iter().map(|(name, ty)| (name.as_str(), ty))
    }

    /// Number of registered names
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether no names are registered
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    // ------------------------------------------------------------------
    // Documentation
    // ------------------------------------------------------------------

    /// Merge a documentation table into this registry's side-table. Can be
    /// applied repeatedly; later merges win per field.
    pub fn merge_documentation(&mut self, docs: DocTable) {
        self.docs.merge(docs);
    }

    /// Description for one field of a record kind, from this registry's own
    /// side-table (ancestors are not consulted)
    pub fn documentation(&self, record_kind: &str, field: &str) -> Option<&str> {
        self.docs.get(record_kind, field)
    }

    /// The registry's documentation side-table
    pub fn docs(&self) -> &DocTable {
        &self.docs
    }
}
