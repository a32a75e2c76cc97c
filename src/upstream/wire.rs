//! Raw wire shapes of the upstream statistics API.
//!
//! These mirror the JSON the service actually sends; they are converted to
//! the domain models by the `normalize` module and never leave this crate.
//! Fields default aggressively so one odd item cannot fail a whole payload.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Map;

/// The `{"data": ...}` envelope wrapping every upstream response.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct WireNames {
    #[serde(default)]
    pub international: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct WireAsset {
    #[serde(default)]
    pub uri: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireGame {
    pub id: String,
    #[serde(default)]
    pub names: WireNames,
    #[serde(rename = "release-date", default)]
    pub release_date: Option<String>,
    /// Keyed by asset kind ("background", "logo", ...); entries can be null.
    #[serde(default)]
    pub assets: HashMap<String, Option<WireAsset>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireCategory {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireVariable {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "is-subcategory", default)]
    pub is_subcategory: bool,
    #[serde(default)]
    pub values: WireValues,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct WireValues {
    /// Value id → value payload. Upstream object order is authoritative for
    /// option display order, which is why serde_json's preserve_order
    /// feature is enabled.
    #[serde(default)]
    pub values: Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireValue {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub rules: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireLeaderboard {
    #[serde(default)]
    pub runs: Vec<WirePlacedRun>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WirePlacedRun {
    pub run: WireRun,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireRun {
    #[serde(default)]
    pub players: Vec<WirePlayerRef>,
    pub times: WireTimes,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct WireTimes {
    #[serde(default)]
    pub primary_t: f64,
}

/// A run's player reference: either a registered account (`rel == "user"`,
/// resolved via the `uri`) or a guest carrying only a literal `name`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct WirePlayerRef {
    #[serde(default)]
    pub rel: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
}

impl WirePlayerRef {
    pub fn is_registered(&self) -> bool {
        self.rel == "user"
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireUser {
    #[serde(default)]
    pub names: WireNames,
    #[serde(rename = "name-style", default)]
    pub name_style: Option<WireNameStyle>,
    #[serde(default)]
    pub location: Option<WireLocation>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct WireNameStyle {
    #[serde(default)]
    pub style: String,
    #[serde(default)]
    pub color: Option<WireColor>,
    #[serde(rename = "color-from", default)]
    pub color_from: Option<WireColor>,
    #[serde(rename = "color-to", default)]
    pub color_to: Option<WireColor>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct WireColor {
    #[serde(default)]
    pub light: String,
    #[serde(default)]
    pub dark: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct WireLocation {
    #[serde(default)]
    pub country: Option<WireCountry>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct WireCountry {
    #[serde(default)]
    pub code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_unwraps_data() {
        let json = r#"{"data": [{"id": "abc", "name": "Any%"}]}"#;
        let env: Envelope<Vec<WireCategory>> = serde_json::from_str(json).unwrap();
        assert_eq!(env.data.len(), 1);
        assert_eq!(env.data[0].id, "abc");
    }

    #[test]
    fn test_game_decodes_background_asset() {
        let json = r#"{
            "id": "w20p0zkn",
            "names": {"international": "Dark Souls"},
            "release-date": "2011-09-22",
            "assets": {
                "background": {"uri": "https://example.com/bg.png"},
                "logo": null
            }
        }"#;
        let game: WireGame = serde_json::from_str(json).unwrap();
        assert_eq!(game.names.international.as_deref(), Some("Dark Souls"));
        let bg = game.assets.get("background").unwrap().as_ref().unwrap();
        assert_eq!(bg.uri.as_deref(), Some("https://example.com/bg.png"));
    }

    #[test]
    fn test_variable_values_preserve_upstream_order() {
        let json = r#"{
            "id": "5lyjpk0l",
            "name": "Route",
            "is-subcategory": true,
            "values": {"values": {"zzz": {"label": "First"}, "aaa": {"label": "Second"}}}
        }"#;
        let var: WireVariable = serde_json::from_str(json).unwrap();
        let keys: Vec<&str> = var.values.values.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["zzz", "aaa"]);
    }

    #[test]
    fn test_player_ref_kinds() {
        let user: WirePlayerRef = serde_json::from_str(
            r#"{"rel": "user", "id": "x", "uri": "https://example.com/users/x"}"#,
        )
        .unwrap();
        let guest: WirePlayerRef =
            serde_json::from_str(r#"{"rel": "guest", "name": "SomeGuest"}"#).unwrap();

        assert!(user.is_registered());
        assert!(!guest.is_registered());
        assert_eq!(guest.name.as_deref(), Some("SomeGuest"));
    }

    #[test]
    fn test_leaderboard_run_times() {
        let json = r#"{
            "runs": [
                {"place": 1, "run": {"players": [{"rel": "guest", "name": "A"}], "times": {"primary_t": 1234.5}}}
            ]
        }"#;
        let board: WireLeaderboard = serde_json::from_str(json).unwrap();
        assert_eq!(board.runs.len(), 1);
        assert!((board.runs[0].run.times.primary_t - 1234.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_user_with_gradient_style() {
        let json = r##"{
            "names": {"international": "Catalystz"},
            "name-style": {
                "style": "gradient",
                "color-from": {"light": "#E77471", "dark": "#E77471"},
                "color-to": {"light": "#E5B3FE", "dark": "#E5B3FE"}
            },
            "location": {"country": {"code": "us"}}
        }"##;
        let user: WireUser = serde_json::from_str(json).unwrap();
        let style = user.name_style.unwrap();
        assert_eq!(style.style, "gradient");
        assert_eq!(style.color_from.unwrap().light, "#E77471");
        assert_eq!(
            user.location.unwrap().country.unwrap().code.as_deref(),
            Some("us")
        );
    }
}
