//! Category model.

use serde::{Deserialize, Serialize};

use super::{CategoryId, GameId};

/// A run category belonging to one game (e.g. "Any%", "All Bosses").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Upstream-assigned id
    pub id: CategoryId,

    /// Category name
    pub name: String,

    /// Game this category belongs to
    pub game_id: GameId,
}

impl Category {
    /// Create a new Category.
    pub fn new(
        id: impl Into<CategoryId>,
        name: impl Into<String>,
        game_id: impl Into<GameId>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            game_id: game_id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_creation() {
        let category = Category::new("jdzme6kv", "Any%", "w20p0zkn");
        assert_eq!(category.id.as_str(), "jdzme6kv");
        assert_eq!(category.name, "Any%");
        assert_eq!(category.game_id.as_str(), "w20p0zkn");
    }

    #[test]
    fn test_category_serialization() {
        let category = Category::new("jdzme6kv", "Any%", "w20p0zkn");
        let json = serde_json::to_string(&category).unwrap();
        let deserialized: Category = serde_json::from_str(&json).unwrap();
        assert_eq!(category, deserialized);
    }
}
