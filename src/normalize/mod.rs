//! Shapes raw upstream payloads into the display model.
//!
//! Everything here is pure: wire structs in, domain models out. Ranks are
//! recomputed from the delivered order (`index + 1`), never trusted from
//! upstream, and option/variable ordering is preserved exactly as received.
//! Malformed items degrade per-item with a warning instead of failing the
//! whole payload.

use tracing::warn;

use crate::models::{
    Category, CategoryId, Game, GameId, Leaderboard, NameStyle, RunEntry, StyleColor, Variable,
    VariableOption,
};
use crate::upstream::wire::{
    WireCategory, WireGame, WireLeaderboard, WireNameStyle, WireUser, WireValue, WireVariable,
};

/// Resolved identity for one run's player.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerDetails {
    pub name: String,
    pub style: Option<NameStyle>,
    pub country: Option<String>,
}

impl PlayerDetails {
    /// Fallback identity for guest runners and failed account lookups.
    pub fn guest(name: Option<&str>) -> Self {
        Self {
            name: name.unwrap_or("Anonymous").to_string(),
            style: None,
            country: None,
        }
    }
}

/// Normalize the curated game list.
pub fn games(wire: Vec<WireGame>) -> Vec<Game> {
    wire.into_iter()
        .map(|g| {
            let name = g
                .names
                .international
                .unwrap_or_else(|| g.id.clone());
            let background_url = g
                .assets
                .get("background")
                .and_then(|a| a.as_ref())
                .and_then(|a| a.uri.clone());
            Game {
                id: GameId::from(g.id),
                name,
                release_date: g.release_date,
                background_url,
            }
        })
        .collect()
}

/// Normalize a game's category list.
pub fn categories(wire: Vec<WireCategory>, game_id: &GameId) -> Vec<Category> {
    wire.into_iter()
        .map(|c| Category {
            id: CategoryId::from(c.id),
            name: c.name,
            game_id: game_id.clone(),
        })
        .collect()
}

/// Normalize a category's variables, keeping only those flagged as
/// sub-categories. Upstream order is authoritative for both the variables
/// and their options.
pub fn subcategory_variables(wire: Vec<WireVariable>) -> Vec<Variable> {
    wire.into_iter()
        .filter(|v| v.is_subcategory)
        .map(|v| {
            let options = v
                .values
                .values
                .into_iter()
                .filter_map(|(value_id, raw)| {
                    match serde_json::from_value::<WireValue>(raw) {
                        Ok(value) => Some(VariableOption {
                            id: value_id.into(),
                            label: value.label,
                            rules: value.rules,
                        }),
                        Err(e) => {
                            warn!("Skipping malformed value {} of variable {}: {}", value_id, v.id, e);
                            None
                        }
                    }
                })
                .collect();
            Variable {
                id: v.id.into(),
                name: v.name,
                is_subcategory: true,
                options,
            }
        })
        .collect()
}

/// Build the display leaderboard from ranked runs and their resolved players.
///
/// `players` must be index-aligned with `board.runs`; normalizing the same
/// input twice yields the same output.
pub fn leaderboard(board: &WireLeaderboard, players: &[PlayerDetails]) -> Leaderboard {
    board
        .runs
        .iter()
        .enumerate()
        .map(|(index, placed)| {
            let details = players
                .get(index)
                .cloned()
                .unwrap_or_else(|| PlayerDetails::guest(None));
            RunEntry {
                rank: index as u32 + 1,
                player: details.name,
                style: details.style,
                country: details.country,
                time_seconds: placed.run.times.primary_t,
            }
        })
        .collect()
}

/// Resolve a registered account payload into player details.
pub fn player(user: WireUser) -> PlayerDetails {
    let name = user
        .names
        .international
        .unwrap_or_else(|| "Anonymous".to_string());
    let style = user.name_style.and_then(name_style);
    let country = user
        .location
        .and_then(|l| l.country)
        .and_then(|c| c.code);
    PlayerDetails {
        name,
        style,
        country,
    }
}

fn name_style(wire: WireNameStyle) -> Option<NameStyle> {
    let color = |c: crate::upstream::wire::WireColor| StyleColor {
        light: c.light,
        dark: c.dark,
    };
    match wire.style.as_str() {
        "solid" => Some(NameStyle::Solid {
            color: color(wire.color?),
        }),
        "gradient" => Some(NameStyle::Gradient {
            color_from: color(wire.color_from?),
            color_to: color(wire.color_to?),
        }),
        other => {
            warn!("Unknown name style {:?}", other);
            None
        }
    }
}
