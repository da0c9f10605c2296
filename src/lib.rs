//! Schemabind
//!
//! Declarative schema catalogs for attributed-tree records: type categories,
//! inheritance, per-field overrides, and declared-size validation.
//!
//! ## Features
//!
//! - **Four Type Categories**: Primitive, Object, MultiAttr, and List types
//!   as one closed sum, with shared identity across aliases
//! - **Inheritance**: Registries resolve missing names through parent
//!   registries held in a caller-owned catalog
//! - **Declared-Size Validation**: Sized registries pin every type to an
//!   expected byte size, enforced when binding instance documents
//! - **Per-Field Overrides**: A registry can claim individual record fields
//!   and retype them, bypassing size checks
//! - **Documentation Side-Tables**: Field descriptions parsed from
//!   component-documentation text and merged into registries
//!
//! ## Architecture
//!
//! ```text
//! schema document (*.tree.json)
//! └── loader -> Schema -> SchemaCatalog
//!     ├── types:     name -> TypeRef (ordered, shared across aliases)
//!     ├── overrides: (record kind, field) -> type name
//!     └── docs:      (record kind, field) -> description
//!
//! instance document (*.tree.json)
//! └── binder -> InstanceSchema (components size-checked against a catalog)
//! ```

pub mod binder;
pub mod catalog;
pub mod config;
pub mod docs;
pub mod error;
pub mod fingerprint;
pub mod loader;
pub mod schema;
pub mod tree;
pub mod types;

pub use binder::{bind_instance, BoundComponent, BoundField, InstanceSchema};
pub use catalog::SchemaCatalog;
pub use docs::DocTable;
pub use error::{Result, SchemaError};
pub use fingerprint::Fingerprint;
pub use loader::{load_document, load_document_with_parent};
pub use schema::Schema;
pub use tree::Element;
pub use types::{normalize_type_name, ScalarKind, SchemaType, TypeKind, TypeRef};
