use axum::{extract::State, Json};
use serde::Deserialize;

use crate::{
    error::AppResult,
    models::MovieId,
    services::recommendations::{self, DEFAULT_FAVORITES},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    #[serde(default)]
    pub favorites: Vec<MovieId>,
}

/// Handler for the recommendations endpoint
///
/// Fetches the model's prediction table and re-ranks it against the caller's
/// favorites. An empty favorites list gets the fixed default pair so the
/// similarity scores stay well-defined.
pub async fn recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<Vec<MovieId>>> {
    let favorites = if request.favorites.is_empty() {
        DEFAULT_FAVORITES.to_vec()
    } else {
        request.favorites
    };

    let table = state.catalog.top_predictions().await?;
    let picks = recommendations::recommend(&favorites, &table);

    tracing::info!(
        favorites = favorites.len(),
        candidates = table.len(),
        picks = picks.len(),
        "Recommendations computed"
    );

    Ok(Json(picks))
}
