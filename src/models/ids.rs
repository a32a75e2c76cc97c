//! Opaque upstream identifiers.
//!
//! The statistics service assigns every entity a short opaque string id.
//! Ids are never derived locally; they are carried verbatim from upstream
//! responses into queries and persisted state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque entity id assigned by the upstream service.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Wrap an upstream-assigned id string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the id is the empty string.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Type alias for game ids
pub type GameId = EntityId;

/// Type alias for category ids
pub type CategoryId = EntityId;

/// Type alias for variable ids
pub type VariableId = EntityId;

/// Type alias for variable value (option) ids
pub type ValueId = EntityId;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id_from_str() {
        let id = EntityId::from("o1y9wo6q");
        assert_eq!(id.as_str(), "o1y9wo6q");
    }

    #[test]
    fn test_entity_id_display() {
        let id = EntityId::new("w20p0zkn");
        assert_eq!(format!("{}", id), "w20p0zkn");
    }

    #[test]
    fn test_entity_id_debug() {
        let id = EntityId::new("jdzme6kv");
        assert!(format!("{:?}", id).contains("jdzme6kv"));
    }

    #[test]
    fn test_entity_id_equality() {
        let id1 = EntityId::from("same");
        let id2 = EntityId::from("same");
        let id3 = EntityId::from("different");
        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
    }

    #[test]
    fn test_entity_id_serialization_is_transparent() {
        let id = EntityId::from("o1y9wo6q");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"o1y9wo6q\"");

        let deserialized: EntityId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }

    #[test]
    fn test_entity_id_empty() {
        assert!(EntityId::new("").is_empty());
        assert!(!EntityId::new("x").is_empty());
    }
}
