//! Game model.

use serde::{Deserialize, Serialize};

use super::GameId;

/// A game in the curated collection.
///
/// Immutable once fetched; discarded when the viewer navigates back to the
/// game list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    /// Upstream-assigned id
    pub id: GameId,

    /// International display name
    pub name: String,

    /// Release date (YYYY-MM-DD) if the upstream knows it
    pub release_date: Option<String>,

    /// Background artwork URL
    pub background_url: Option<String>,
}

impl Game {
    /// Create a new Game with just an id and display name.
    pub fn new(id: impl Into<GameId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            release_date: None,
            background_url: None,
        }
    }

    /// Builder method to set the release date.
    pub fn with_release_date(mut self, date: impl Into<String>) -> Self {
        self.release_date = Some(date.into());
        self
    }

    /// Builder method to set the background URL.
    pub fn with_background_url(mut self, url: impl Into<String>) -> Self {
        self.background_url = Some(url.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_creation() {
        let game = Game::new("w20p0zkn", "Dark Souls");
        assert_eq!(game.id.as_str(), "w20p0zkn");
        assert_eq!(game.name, "Dark Souls");
        assert!(game.release_date.is_none());
        assert!(game.background_url.is_none());
    }

    #[test]
    fn test_game_builder() {
        let game = Game::new("w20p0zkn", "Dark Souls")
            .with_release_date("2011-09-22")
            .with_background_url("https://example.com/bg.png");

        assert_eq!(game.release_date.as_deref(), Some("2011-09-22"));
        assert_eq!(
            game.background_url.as_deref(),
            Some("https://example.com/bg.png")
        );
    }

    #[test]
    fn test_game_serialization() {
        let game = Game::new("w20p0zkn", "Dark Souls").with_release_date("2011-09-22");

        let json = serde_json::to_string(&game).unwrap();
        let deserialized: Game = serde_json::from_str(&json).unwrap();

        assert_eq!(game, deserialized);
    }
}
