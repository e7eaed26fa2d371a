//! Document references that may or may not be populated.

use serde::{Deserialize, Serialize};

/// A reference to another backend document.
///
/// List endpoints sometimes populate references (`"bus_id": { ... }`) and
/// sometimes send only the id (`"bus_id": "64f..."`). Both shapes
/// deserialize into this enum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Ref<T> {
    /// The referenced document, embedded.
    Populated(T),
    /// Only the referenced document's id.
    Id(String),
}

impl<T> Ref<T> {
    /// The embedded document, if populated.
    pub fn populated(&self) -> Option<&T> {
        match self {
            Self::Populated(doc) => Some(doc),
            Self::Id(_) => None,
        }
    }

    /// The bare id, if not populated.
    pub fn bare_id(&self) -> Option<&str> {
        match self {
            Self::Populated(_) => None,
            Self::Id(id) => Some(id),
        }
    }
}
