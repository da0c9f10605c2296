//! Content fingerprints for loaded schema documents

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::tree::Element;

/// SHA256 fingerprint of a schema document
///
/// Stamped on every registry at load time so callers can tell whether a
/// document changed between runs without diffing trees.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Fingerprint a document tree via its canonical JSON encoding
    pub fn of_document(root: &Element) -> Self {
        let canonical = serde_json::to_string(root).unwrap_or_default();
        Self::from_bytes(canonical.as_bytes())
    }

    /// Fingerprint raw bytes
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = Sha256::digest(data);
        Self(format!("{:x}", hash))
    }

    /// Hex string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
