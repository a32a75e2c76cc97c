use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{CategoryId, Variable};

#[derive(Debug, Deserialize)]
pub struct VariablesParams {
    pub category_id: Option<String>,
}

/// Sub-category variables of one category, in upstream order.
///
/// An empty list is a valid response; the viewer fetches the leaderboard
/// directly when a category has nothing to drill into.
pub async fn list_variables(
    State(state): State<AppState>,
    Query(params): Query<VariablesParams>,
) -> Result<Json<Vec<Variable>>, ApiError> {
    let category_id = params
        .category_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::BadRequest("category_id is required".to_string()))?;

    let variables = state
        .source
        .list_variables(&CategoryId::from(category_id))
        .await?;
    Ok(Json(variables))
}
