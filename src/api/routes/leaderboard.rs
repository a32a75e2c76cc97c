use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{format_hms, NameStyle, Selection};

#[derive(Debug, Deserialize)]
pub struct LeaderboardParams {
    pub game_id: Option<String>,
    pub category_id: Option<String>,
    pub variable_id: Option<String>,
    pub value_id: Option<String>,
}

/// One row of the proxy leaderboard response.
#[derive(Debug, Serialize)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub player: String,
    pub style: Option<NameStyle>,
    pub country: Option<String>,
    /// Run time preformatted as `HH:MM:SS`
    pub time: String,
}

/// Ranked, player-resolved runs for a selection.
pub async fn get_leaderboard(
    State(state): State<AppState>,
    Query(params): Query<LeaderboardParams>,
) -> Result<Json<Vec<LeaderboardEntry>>, ApiError> {
    let game_id = params
        .game_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::BadRequest("game_id is required".to_string()))?;
    let category_id = params
        .category_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::BadRequest("category_id is required".to_string()))?;

    let selection = match (params.variable_id, params.value_id) {
        (Some(variable_id), Some(value_id)) => {
            Selection::new(game_id, category_id).with_value(variable_id, value_id)
        }
        (None, None) => Selection::new(game_id, category_id),
        _ => {
            return Err(ApiError::BadRequest(
                "variable_id and value_id must be supplied together".to_string(),
            ))
        }
    };

    let board = state.source.fetch_leaderboard(&selection).await?;
    let entries = board
        .into_iter()
        .map(|run| LeaderboardEntry {
            rank: run.rank,
            player: run.player,
            style: run.style,
            country: run.country,
            time: format_hms(run.time_seconds),
        })
        .collect();
    Ok(Json(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::api::{build_router, state::AppState};
    use crate::models::{Category, CategoryId, Game, GameId, Leaderboard, RunEntry, Variable};
    use crate::upstream::{FetchError, StatsSource};

    /// Source returning a fixed board for one selection and failing for
    /// games, to exercise both proxy paths.
    struct FixtureSource {
        boards: HashMap<Selection, Leaderboard>,
    }

    #[async_trait]
    impl StatsSource for FixtureSource {
        async fn list_games(&self) -> Result<Vec<Game>, FetchError> {
            Err(FetchError::HttpStatus {
                status: 503,
                message: "Service Unavailable".to_string(),
            })
        }

        async fn list_categories(&self, _game_id: &GameId) -> Result<Vec<Category>, FetchError> {
            Ok(Vec::new())
        }

        async fn list_variables(
            &self,
            _category_id: &CategoryId,
        ) -> Result<Vec<Variable>, FetchError> {
            Ok(Vec::new())
        }

        async fn fetch_leaderboard(
            &self,
            selection: &Selection,
        ) -> Result<Leaderboard, FetchError> {
            Ok(self.boards.get(selection).cloned().unwrap_or_default())
        }
    }

    fn router() -> axum::Router {
        let selection = Selection::new("g1", "c1").with_value("v1", "o1");
        let board = vec![
            RunEntry::new(1, "First", 3661.0).with_country("us"),
            RunEntry::new(2, "Second", 3700.0),
        ];
        let mut boards = HashMap::new();
        boards.insert(selection, board);

        build_router(AppState {
            source: Arc::new(FixtureSource { boards }),
        })
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_leaderboard_response_shape() {
        let response = router()
            .oneshot(
                Request::get(
                    "/api/leaderboard?game_id=g1&category_id=c1&variable_id=v1&value_id=o1",
                )
                .body(Body::empty())
                .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json[0]["rank"], 1);
        assert_eq!(json[0]["player"], "First");
        assert_eq!(json[0]["country"], "us");
        assert_eq!(json[0]["time"], "01:01:01");
        assert_eq!(json[1]["rank"], 2);
    }

    #[tokio::test]
    async fn test_leaderboard_requires_game_and_category() {
        let response = router()
            .oneshot(
                Request::get("/api/leaderboard?category_id=c1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_leaderboard_rejects_half_a_filter() {
        let response = router()
            .oneshot(
                Request::get("/api/leaderboard?game_id=g1&category_id=c1&variable_id=v1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_selection_is_empty_list() {
        let response = router()
            .oneshot(
                Request::get("/api/leaderboard?game_id=nope&category_id=nope")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json.as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_games_failure_maps_to_bad_gateway() {
        let response = router()
            .oneshot(Request::get("/api/games").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "UPSTREAM");
    }

    #[tokio::test]
    async fn test_variables_require_category_id() {
        let response = router()
            .oneshot(Request::get("/api/variables").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
