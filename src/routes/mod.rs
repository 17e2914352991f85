use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use crate::state::AppState;

pub mod catalog;
pub mod metadata;
pub mod recommendations;
pub mod search;

/// Creates the application router with all routes
///
/// Endpoints sit at the top level: this API carries no versioning and no
/// authentication.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/load_movies", get(catalog::load_movies))
        .route("/search", get(search::search))
        .route("/recommendations", post(recommendations::recommend))
        .route("/posters", get(metadata::poster))
        .route("/details", get(metadata::details))
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
