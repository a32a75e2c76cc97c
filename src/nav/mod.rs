//! Drill-down navigation state machine.
//!
//! Tracks the viewer's position (game → category → sub-category value →
//! leaderboard) and decides which fetch follows each transition. The machine
//! is pure and synchronous: user operations and fetch completions go in,
//! [`Effect`]s come out, and the session driver performs the actual I/O.
//!
//! Every completion carries the key it was fetched for. A completion whose
//! key no longer matches the current position is discarded, so out-of-order
//! responses from abandoned selections can never overwrite newer state.
//!
//! Loading is represented by absence: a `None` list means the fetch is in
//! flight, while `Some` with zero items is the explicit "empty or failed"
//! value the presentation layer renders as a failure state.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::models::{
    Category, CategoryId, Game, GameId, Leaderboard, Selection, Variable, VariableId,
    VariableOption,
};
use crate::upstream::FetchError;

/// A fetch the session driver should issue for the navigator.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchRequest {
    Games,
    Categories { game_id: GameId },
    Variables { category_id: CategoryId },
    Leaderboard { selection: Selection },
}

/// Side effect of a navigation transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Cancel any active rotation before the next fetch
    StopRotation,

    /// Start rotating the just-loaded leaderboard
    StartRotation { len: usize },

    /// Issue a fetch
    Fetch(FetchRequest),
}

/// Drill-down position, derived from the navigator's data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavPhase {
    NoGame,
    GameSelected,
    CategorySelected,
    VariableSelected,
    LeaderboardLoaded,
}

/// Navigation state machine.
pub struct Navigator {
    /// Per-game override of which sub-category variable becomes active
    overrides: HashMap<GameId, VariableId>,

    games: Option<Vec<Game>>,
    selected_game: Option<Game>,
    categories: Option<Vec<Category>>,
    selected_category: Option<Category>,
    active_variable: Option<Variable>,
    leaderboard: Option<Leaderboard>,

    /// Key of the in-flight or displayed leaderboard fetch
    selection: Option<Selection>,
}

impl Navigator {
    pub fn new(overrides: HashMap<GameId, VariableId>) -> Self {
        Self {
            overrides,
            games: None,
            selected_game: None,
            categories: None,
            selected_category: None,
            active_variable: None,
            leaderboard: None,
            selection: None,
        }
    }

    /// Kick off the initial game-list fetch.
    pub fn init(&mut self) -> Vec<Effect> {
        vec![Effect::Fetch(FetchRequest::Games)]
    }

    /// Jump straight to a previously persisted selection, bypassing the
    /// intermediate drill-down states.
    pub fn restore(&mut self, selection: Selection) -> Vec<Effect> {
        self.clear_below_game_list();
        self.selected_game = None;
        self.selection = Some(selection.clone());
        vec![
            Effect::StopRotation,
            Effect::Fetch(FetchRequest::Leaderboard { selection }),
        ]
    }

    // ── User transitions ─────────────────────────────────────────────

    pub fn select_game(&mut self, game: Game) -> Vec<Effect> {
        self.clear_below_game_list();
        let game_id = game.id.clone();
        self.selected_game = Some(game);
        vec![
            Effect::StopRotation,
            Effect::Fetch(FetchRequest::Categories { game_id }),
        ]
    }

    pub fn select_category(&mut self, category: Category) -> Vec<Effect> {
        if self.selected_game.is_none() {
            warn!("Category selected with no game active; ignoring");
            return Vec::new();
        }
        self.clear_below_categories();
        let category_id = category.id.clone();
        self.selected_category = Some(category);
        vec![
            Effect::StopRotation,
            Effect::Fetch(FetchRequest::Variables { category_id }),
        ]
    }

    pub fn select_option(&mut self, option: &VariableOption) -> Vec<Effect> {
        let (Some(game), Some(category), Some(variable)) = (
            self.selected_game.as_ref(),
            self.selected_category.as_ref(),
            self.active_variable.as_ref(),
        ) else {
            warn!("Option selected with no active variable; ignoring");
            return Vec::new();
        };

        let selection = Selection::new(game.id.clone(), category.id.clone())
            .with_value(variable.id.clone(), option.id.clone());
        self.leaderboard = None;
        self.selection = Some(selection.clone());
        vec![
            Effect::StopRotation,
            Effect::Fetch(FetchRequest::Leaderboard { selection }),
        ]
    }

    pub fn back_to_games(&mut self) -> Vec<Effect> {
        self.clear_below_game_list();
        self.selected_game = None;
        vec![Effect::StopRotation]
    }

    pub fn back_to_categories(&mut self) -> Vec<Effect> {
        self.clear_below_categories();
        vec![Effect::StopRotation]
    }

    // ── Fetch completions ────────────────────────────────────────────

    pub fn games_loaded(&mut self, result: Result<Vec<Game>, FetchError>) -> Vec<Effect> {
        self.games = Some(result.unwrap_or_else(|e| {
            warn!("Game list fetch failed: {}", e);
            Vec::new()
        }));
        Vec::new()
    }

    pub fn categories_loaded(
        &mut self,
        game_id: &GameId,
        result: Result<Vec<Category>, FetchError>,
    ) -> Vec<Effect> {
        if self.selected_game.as_ref().map(|g| &g.id) != Some(game_id) {
            debug!("Discarding stale category list for game {}", game_id);
            return Vec::new();
        }
        self.categories = Some(result.unwrap_or_else(|e| {
            warn!("Category fetch failed for game {}: {}", game_id, e);
            Vec::new()
        }));
        Vec::new()
    }

    /// Apply a variable-list completion.
    ///
    /// With no sub-category variable (none returned, none flagged, or the
    /// fetch failed) the leaderboard is fetched directly with no value
    /// filter. Otherwise the first sub-category variable in upstream order
    /// becomes active, unless the per-game override table names a variable
    /// that is present in the response.
    pub fn variables_loaded(
        &mut self,
        category_id: &CategoryId,
        result: Result<Vec<Variable>, FetchError>,
    ) -> Vec<Effect> {
        if self.selected_category.as_ref().map(|c| &c.id) != Some(category_id)
            || self.active_variable.is_some()
            || self.selection.is_some()
        {
            debug!("Discarding stale variable list for category {}", category_id);
            return Vec::new();
        }

        let variables = result.unwrap_or_else(|e| {
            warn!("Variable fetch failed for category {}: {}", category_id, e);
            Vec::new()
        });
        let mut subcategories: Vec<Variable> =
            variables.into_iter().filter(|v| v.is_subcategory).collect();

        if subcategories.is_empty() {
            let (Some(game), Some(category)) =
                (self.selected_game.as_ref(), self.selected_category.as_ref())
            else {
                return Vec::new();
            };
            let selection = Selection::new(game.id.clone(), category.id.clone());
            self.leaderboard = None;
            self.selection = Some(selection.clone());
            return vec![Effect::Fetch(FetchRequest::Leaderboard { selection })];
        }

        let override_index = self
            .selected_game
            .as_ref()
            .and_then(|g| self.overrides.get(&g.id))
            .and_then(|wanted| subcategories.iter().position(|v| &v.id == wanted));
        let active = subcategories.swap_remove(override_index.unwrap_or(0));
        self.active_variable = Some(active);
        Vec::new()
    }

    pub fn leaderboard_loaded(
        &mut self,
        selection: &Selection,
        result: Result<Leaderboard, FetchError>,
    ) -> Vec<Effect> {
        if self.selection.as_ref() != Some(selection) {
            debug!("Discarding stale leaderboard for abandoned selection");
            return Vec::new();
        }
        let board = result.unwrap_or_else(|e| {
            warn!("Leaderboard fetch failed: {}", e);
            Vec::new()
        });
        let len = board.len();
        self.leaderboard = Some(board);
        vec![Effect::StartRotation { len }]
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn phase(&self) -> NavPhase {
        if self.leaderboard.is_some() {
            NavPhase::LeaderboardLoaded
        } else if self.active_variable.is_some() {
            NavPhase::VariableSelected
        } else if self.selected_category.is_some() || self.selection.is_some() {
            NavPhase::CategorySelected
        } else if self.selected_game.is_some() {
            NavPhase::GameSelected
        } else {
            NavPhase::NoGame
        }
    }

    /// Game list; `None` while loading, empty on fetch failure.
    pub fn games(&self) -> Option<&[Game]> {
        self.games.as_deref()
    }

    pub fn selected_game(&self) -> Option<&Game> {
        self.selected_game.as_ref()
    }

    /// Categories of the selected game; `None` while loading.
    pub fn categories(&self) -> Option<&[Category]> {
        self.categories.as_deref()
    }

    pub fn selected_category(&self) -> Option<&Category> {
        self.selected_category.as_ref()
    }

    /// The sub-category variable whose options are currently offered.
    pub fn active_variable(&self) -> Option<&Variable> {
        self.active_variable.as_ref()
    }

    /// The displayed leaderboard; `None` while loading, empty on failure.
    pub fn leaderboard(&self) -> Option<&Leaderboard> {
        self.leaderboard.as_ref()
    }

    /// Selection of the in-flight or displayed leaderboard.
    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn clear_below_game_list(&mut self) {
        self.categories = None;
        self.clear_below_categories();
    }

    fn clear_below_categories(&mut self) {
        self.selected_category = None;
        self.active_variable = None;
        self.leaderboard = None;
        self.selection = None;
    }
}
