use crate::{error::AppResult, models::MovieSummary, services::providers::SearchProvider};
use std::sync::Arc;

/// Service function for title search
///
/// Short-circuits blank queries to an empty result without touching the
/// index; everything else delegates to the configured [`SearchProvider`].
pub async fn search_titles(
    provider: Arc<dyn SearchProvider>,
    query: &str,
) -> AppResult<Vec<MovieSummary>> {
    if query.trim().is_empty() {
        return Ok(vec![]);
    }

    provider.search_titles(query).await
}
