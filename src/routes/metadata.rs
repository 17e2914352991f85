use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    models::TmdbId,
    state::AppState,
};

/// Served when a title has no posters upstream
pub const POSTER_NOT_FOUND: &str = "../not_found.jpeg";

/// Served when a title has no overview upstream
pub const DETAILS_NOT_FOUND: &str = "Movie details not found";

#[derive(Debug, Deserialize)]
pub struct MetadataQuery {
    tmdb_id: Option<TmdbId>,
}

impl MetadataQuery {
    fn require_id(&self) -> AppResult<TmdbId> {
        self.tmdb_id
            .ok_or_else(|| AppError::InvalidInput("tmdb_id query parameter is required".to_string()))
    }
}

#[derive(Debug, Serialize)]
pub struct PosterResponse {
    pub poster_url: String,
}

#[derive(Debug, Serialize)]
pub struct DetailsResponse {
    pub overview: String,
}

/// Handler for the poster lookup endpoint
pub async fn poster(
    State(state): State<AppState>,
    Query(params): Query<MetadataQuery>,
) -> AppResult<Json<PosterResponse>> {
    let tmdb_id = params.require_id()?;
    let poster_url = state.metadata.poster_url(tmdb_id).await?;

    Ok(Json(PosterResponse {
        poster_url: poster_url.unwrap_or_else(|| POSTER_NOT_FOUND.to_string()),
    }))
}

/// Handler for the movie details endpoint
pub async fn details(
    State(state): State<AppState>,
    Query(params): Query<MetadataQuery>,
) -> AppResult<Json<DetailsResponse>> {
    let tmdb_id = params.require_id()?;
    let overview = state.metadata.overview(tmdb_id).await?;

    Ok(Json(DetailsResponse {
        overview: overview.unwrap_or_else(|| DETAILS_NOT_FOUND.to_string()),
    }))
}
