//! Persisted selection store.
//!
//! Remembers the last fully-specified selection across sessions. The four
//! identifiers are written as one serialized blob through a temp-file +
//! rename, so no partial write is ever observable: [`SelectionStore::load`]
//! either yields a complete selection or nothing.

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::models::Selection;

/// Errors that can occur while persisting a selection.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Selection is not fully specified")]
    IncompleteSelection,
}

const SELECTION_FILE: &str = "selection.json";

/// On-disk shape. Every field is required, so a truncated or hand-edited
/// blob fails to decode as a whole instead of hydrating partially.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedSelection {
    game_id: String,
    category_id: String,
    variable_id: String,
    value_id: String,
    saved_at: DateTime<Utc>,
}

/// File-backed store for the remembered selection.
#[derive(Debug, Clone)]
pub struct SelectionStore {
    dir: PathBuf,
}

impl SelectionStore {
    /// Create a store rooted at the given directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self) -> PathBuf {
        self.dir.join(SELECTION_FILE)
    }

    /// Persist a complete selection.
    ///
    /// The blob is written to a temporary file and renamed into place, so a
    /// crash mid-write leaves either the old record or the new one, never a
    /// torn mix.
    pub fn save(&self, selection: &Selection) -> Result<(), StoreError> {
        let (Some(variable_id), Some(value_id)) =
            (selection.variable_id.as_ref(), selection.value_id.as_ref())
        else {
            return Err(StoreError::IncompleteSelection);
        };

        let record = PersistedSelection {
            game_id: selection.game_id.as_str().to_string(),
            category_id: selection.category_id.as_str().to_string(),
            variable_id: variable_id.as_str().to_string(),
            value_id: value_id.as_str().to_string(),
            saved_at: Utc::now(),
        };

        fs::create_dir_all(&self.dir)?;
        let path = self.path();
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(&record)?)?;
        fs::rename(&tmp, &path)?;

        info!("Saved selection for game {}", record.game_id);
        Ok(())
    }

    /// Load the remembered selection.
    ///
    /// Returns `Some` only when the blob exists, decodes, and carries all
    /// four identifiers; a missing file, decode failure, or empty field all
    /// yield `None`.
    pub fn load(&self) -> Option<Selection> {
        let raw = match fs::read_to_string(self.path()) {
            Ok(raw) => raw,
            Err(e) => {
                debug!("No persisted selection: {}", e);
                return None;
            }
        };
        let record: PersistedSelection = match serde_json::from_str(&raw) {
            Ok(record) => record,
            Err(e) => {
                debug!("Persisted selection unreadable: {}", e);
                return None;
            }
        };
        if record.game_id.is_empty()
            || record.category_id.is_empty()
            || record.variable_id.is_empty()
            || record.value_id.is_empty()
        {
            debug!("Persisted selection has empty identifiers; ignoring");
            return None;
        }

        Some(
            Selection::new(record.game_id, record.category_id)
                .with_value(record.variable_id, record.value_id),
        )
    }

    /// Forget the remembered selection. Clearing an already-empty store is
    /// not an error.
    pub fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(self.path()) {
            Ok(()) => {
                info!("Cleared persisted selection");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
