//! Attributed node trees consumed by the loader and binder
//!
//! The markup parser that produces these trees lives outside this crate: a
//! document arrives as a tag-named element carrying an attribute map and
//! ordered children. Trees round-trip through serde, which is also the
//! on-disk format the CLI binaries read (`*.tree.json`).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SchemaError};

/// One node of an attributed document tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Tag name
    pub tag: String,
    /// Attributes, in document order
    #[serde(default)]
    pub attributes: IndexMap<String, String>,
    /// Child elements, in document order
    #[serde(default)]
    pub children: Vec<Element>,
}

impl Element {
    /// Create an element with no attributes or children
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Add an attribute (builder style)
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Add a child element (builder style)
    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Look up an attribute value
    pub fn get(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Look up an attribute that must be present
    pub fn require(&self, name: &str) -> Result<&str> {
        self.get(name).ok_or_else(|| SchemaError::MissingAttribute {
            element: self.tag.clone(),
            attribute: name.to_string(),
        })
    }

    /// Read a boolean attribute. Only `"1"` and `"0"` are recognized; any
    /// other value, or absence, reads as `None`.
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        match self.get(name)? {
            "1" => Some(true),
            "0" => Some(false),
            _ => None,
        }
    }
}
