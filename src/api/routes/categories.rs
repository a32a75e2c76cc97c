use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{Category, GameId};

#[derive(Debug, Deserialize)]
pub struct CategoriesParams {
    pub game_id: Option<String>,
}

/// Categories of one game.
pub async fn list_categories(
    State(state): State<AppState>,
    Query(params): Query<CategoriesParams>,
) -> Result<Json<Vec<Category>>, ApiError> {
    let game_id = params
        .game_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::BadRequest("game_id is required".to_string()))?;

    let categories = state
        .source
        .list_categories(&GameId::from(game_id))
        .await?;
    Ok(Json(categories))
}
