use axum::{extract::State, Json};

use crate::{error::AppResult, models::Movie, state::AppState};

/// Handler for the catalog load endpoint
///
/// Returns the full warehouse join of movies and their external metadata ids.
pub async fn load_movies(State(state): State<AppState>) -> AppResult<Json<Vec<Movie>>> {
    let movies = state.catalog.load_catalog().await?;

    tracing::info!(movies = movies.len(), "Catalog served");

    Ok(Json(movies))
}
