use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::{
    error::AppResult, models::MovieSummary, services::title_search, state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Absent and empty queries both mean "nothing typed yet"
    #[serde(default)]
    q: String,
}

/// Handler for the title autocomplete endpoint
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<Vec<MovieSummary>>> {
    let summaries = title_search::search_titles(state.search.clone(), &params.q).await?;
    Ok(Json(summaries))
}
