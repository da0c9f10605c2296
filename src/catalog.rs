//! Catalog of loaded registries
//!
//! The catalog is a plain value owned by the caller; loading takes
//! `&mut SchemaCatalog` and resolution takes `&SchemaCatalog`, so the borrow
//! checker serializes loads and no registry is globally shared.

use indexmap::map::Entry;
use indexmap::IndexMap;

use crate::error::{Result, SchemaError};
use crate::schema::Schema;

/// Loaded registries keyed by id, in load order
#[derive(Debug, Clone, Default)]
pub struct SchemaCatalog {
    schemas: IndexMap<String, Schema>,
}

impl SchemaCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a registry under its id. Ids are insert-once: a second
    /// registry with the same id is rejected, never replaced.
    pub fn insert(&mut self, schema: Schema) -> Result<&Schema> {
        match self.schemas.entry(schema.id().to_string()) {
            Entry::Occupied(entry) => Err(SchemaError::DuplicateSchemaId {
                id: entry.key().clone(),
            }),
            Entry::Vacant(entry) => Ok(entry.insert(schema)),
        }
    }

    /// Look up a registry by id
    pub fn get(&self, id: &str) -> Option<&Schema> {
        self.schemas.get(id)
    }

    /// Mutable lookup, for post-load documentation merges
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Schema> {
        self.schemas.get_mut(id)
    }

    /// Whether a registry with this id is loaded
    pub fn contains(&self, id: &str) -> bool {
        self.schemas.contains_key(id)
    }

    /// Loaded ids in load order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    /// Loaded registries in load order
    pub fn iter(&self) -> impl Iterator<Item = &Schema> {
        self.schemas.values()
    }

    /// Number of loaded registries
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut catalog = SchemaCatalog::new();
        catalog.insert(Schema::new("ecs")).unwrap();

        assert!(catalog.contains("ecs"));
        assert_eq!(catalog.get("ecs").unwrap().id(), "ecs");
        assert!(catalog.get("other").is_none());
    }

    #[test]
    fn test_duplicate_id_is_rejected() {
        let mut catalog = SchemaCatalog::new();
        catalog.insert(Schema::new("ecs")).unwrap();

        match catalog.insert(Schema::new("ecs")) {
            Err(SchemaError::DuplicateSchemaId { id }) => assert_eq!(id, "ecs"),
            other => panic!("Expected DuplicateSchemaId, got {:?}", other),
        }
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_ids_keep_load_order() {
        let mut catalog = SchemaCatalog::new();
        catalog.insert(Schema::new("engine")).unwrap();
        catalog.insert(Schema::new("game")).unwrap();
        catalog.insert(Schema::new("mod")).unwrap();

        let ids: Vec<_> = catalog.ids().collect();
        assert_eq!(ids, vec!["engine", "game", "mod"]);
    }
}
