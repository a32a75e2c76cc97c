//! Run entry and leaderboard models.

use serde::{Deserialize, Serialize};

/// A light/dark color pair for styled player names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleColor {
    pub light: String,
    pub dark: String,
}

/// Player name styling, mirrored from upstream account settings.
///
/// Serialized in the upstream shape (`{"style": "solid", "color": ...}` /
/// `{"style": "gradient", "color-from": ..., "color-to": ...}`) so the
/// presentation layer can consume it unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "style", rename_all = "lowercase")]
pub enum NameStyle {
    Solid {
        color: StyleColor,
    },
    Gradient {
        #[serde(rename = "color-from")]
        color_from: StyleColor,
        #[serde(rename = "color-to")]
        color_to: StyleColor,
    },
}

/// One ranked run on a leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunEntry {
    /// 1-based dense rank, recomputed from the delivered order
    pub rank: u32,

    /// Resolved player display name (literal name for guest runners)
    pub player: String,

    /// Name styling for registered accounts
    pub style: Option<NameStyle>,

    /// ISO country code for registered accounts
    pub country: Option<String>,

    /// Primary run time in seconds
    pub time_seconds: f64,
}

impl RunEntry {
    /// Create a new entry.
    pub fn new(rank: u32, player: impl Into<String>, time_seconds: f64) -> Self {
        Self {
            rank,
            player: player.into(),
            style: None,
            country: None,
            time_seconds,
        }
    }

    /// Builder method to set the name style.
    pub fn with_style(mut self, style: NameStyle) -> Self {
        self.style = Some(style);
        self
    }

    /// Builder method to set the country code.
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Run time as `HH:MM:SS`.
    pub fn formatted_time(&self) -> String {
        format_hms(self.time_seconds)
    }
}

/// An ordered run list for one fully-specified selection.
///
/// Never cached across selections: a selection change always replaces the
/// whole list. An empty list is the explicit "no data / fetch failed" value,
/// distinct from a leaderboard that has not been loaded yet (absent).
pub type Leaderboard = Vec<RunEntry>;

/// Format a run time in seconds as `HH:MM:SS` (fractional seconds floored).
pub fn format_hms(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}

/// Format a run time for display, trimming a zero hour to `MM:SS`.
pub fn format_display(seconds: f64) -> String {
    let hms = format_hms(seconds);
    match hms.strip_prefix("00:") {
        Some(rest) => rest.to_string(),
        None => hms,
    }
}
