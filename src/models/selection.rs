//! Viewer selection model.

use serde::{Deserialize, Serialize};

use super::{CategoryId, GameId, ValueId, VariableId};

/// The tuple determining which leaderboard is displayed.
///
/// Built up during drill-down; also the key every in-flight leaderboard
/// fetch carries, so late responses for an abandoned selection can be
/// discarded (stale-response guard).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    pub game_id: GameId,
    pub category_id: CategoryId,
    pub variable_id: Option<VariableId>,
    pub value_id: Option<ValueId>,
}

impl Selection {
    /// Selection for a category with no sub-category variable.
    pub fn new(game_id: impl Into<GameId>, category_id: impl Into<CategoryId>) -> Self {
        Self {
            game_id: game_id.into(),
            category_id: category_id.into(),
            variable_id: None,
            value_id: None,
        }
    }

    /// Selection filtered to one sub-category value.
    pub fn with_value(mut self, variable_id: impl Into<VariableId>, value_id: impl Into<ValueId>) -> Self {
        self.variable_id = Some(variable_id.into());
        self.value_id = Some(value_id.into());
        self
    }

    /// True when all four identifiers are present.
    ///
    /// Only complete selections are persisted; categories without a
    /// sub-category variable produce two-field selections that fetch fine
    /// but are never remembered.
    pub fn is_complete(&self) -> bool {
        self.variable_id.is_some() && self.value_id.is_some()
    }
}
