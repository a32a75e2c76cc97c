//! Variable and option models.
//!
//! A category can carry several variables, but only those flagged as
//! sub-categories partition the leaderboard. Option order always preserves
//! the upstream ordering, which is authoritative and never re-sorted.

use serde::{Deserialize, Serialize};

use super::{ValueId, VariableId};

/// A category variable (e.g. "NG / NG+", "Glitch category").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    /// Upstream-assigned id
    pub id: VariableId,

    /// Variable name
    pub name: String,

    /// Whether this variable partitions the leaderboard
    pub is_subcategory: bool,

    /// Selectable values, in upstream order
    pub options: Vec<VariableOption>,
}

impl Variable {
    /// Create a new Variable.
    pub fn new(id: impl Into<VariableId>, name: impl Into<String>, is_subcategory: bool) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_subcategory,
            options: Vec::new(),
        }
    }

    /// Builder method to append an option.
    pub fn with_option(mut self, option: VariableOption) -> Self {
        self.options.push(option);
        self
    }

    /// Look up an option by value id.
    pub fn option(&self, value_id: &ValueId) -> Option<&VariableOption> {
        self.options.iter().find(|o| &o.id == value_id)
    }
}

/// One selectable value of a variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableOption {
    /// Upstream-assigned value id
    pub id: ValueId,

    /// Display label
    pub label: String,

    /// Rules text for this value, if any
    pub rules: Option<String>,
}

impl VariableOption {
    /// Create a new option.
    pub fn new(id: impl Into<ValueId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            rules: None,
        }
    }

    /// Builder method to set the rules text.
    pub fn with_rules(mut self, rules: impl Into<String>) -> Self {
        self.rules = Some(rules.into());
        self
    }
}
