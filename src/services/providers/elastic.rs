/// Search index provider (Elasticsearch-compatible REST API)
///
/// One operation: prefix-match movie titles for autocomplete. The index is
/// maintained out-of-band; this client only reads it.
use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{MovieSummary, SearchResponse},
    services::providers::SearchProvider,
};
use reqwest::Client as HttpClient;
use serde_json::json;

const SEARCH_CACHE_TTL: u64 = 3600; // 1 hour

/// Hit cap and prefix-expansion budget for one query
const MAX_RESULTS: u32 = 50;

#[derive(Clone)]
pub struct ElasticProvider {
    http_client: HttpClient,
    api_url: String,
    api_key: String,
    index: String,
    cache: Cache,
}

impl ElasticProvider {
    pub fn new(cache: Cache, api_url: String, api_key: String, index: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_url,
            api_key,
            index,
            cache,
        }
    }

    fn search_body(query: &str) -> serde_json::Value {
        json!({
            "size": MAX_RESULTS,
            "query": {
                "match_phrase_prefix": {
                    "title": {
                        "query": query,
                        "max_expansions": MAX_RESULTS,
                    }
                }
            }
        })
    }
}

#[async_trait::async_trait]
impl SearchProvider for ElasticProvider {
    async fn search_titles(&self, query: &str) -> AppResult<Vec<MovieSummary>> {
        cached!(
            self.cache,
            CacheKey::TitleSearch(query.to_string()),
            SEARCH_CACHE_TTL,
            async move {
                let url = format!("{}/{}/_search", self.api_url, self.index);

                let response = self
                    .http_client
                    .post(&url)
                    .header("Authorization", format!("ApiKey {}", self.api_key))
                    .json(&Self::search_body(query))
                    .send()
                    .await?;

                if !response.status().is_success() {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    return Err(AppError::ExternalApi(format!(
                        "Search API returned status {}: {}",
                        status, body
                    )));
                }

                let search_response: SearchResponse = response.json().await?;
                let summaries: Vec<MovieSummary> = search_response
                    .hits
                    .hits
                    .into_iter()
                    .map(|hit| MovieSummary::from(hit.source))
                    .collect();

                tracing::info!(
                    query = %query,
                    results = summaries.len(),
                    provider = "elastic",
                    "Title search completed"
                );

                Ok(summaries)
            }
        )
    }

    fn name(&self) -> &'static str {
        "elastic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_body_prefix_query() {
        let body = ElasticProvider::search_body("toy st");

        assert_eq!(body["size"], 50);
        assert_eq!(
            body["query"]["match_phrase_prefix"]["title"]["query"],
            "toy st"
        );
        assert_eq!(
            body["query"]["match_phrase_prefix"]["title"]["max_expansions"],
            50
        );
    }

    #[test]
    fn test_search_response_unwraps_sources() {
        let json = r#"{
            "took": 3,
            "hits": {
                "total": {"value": 2},
                "hits": [
                    {"_source": {"movieId": 1, "title": "Toy Story (1995)", "genres": "Adventure|Animation"}},
                    {"_source": {"movieId": 3114, "title": "Toy Story 2 (1999)"}}
                ]
            }
        }"#;

        let response: SearchResponse = serde_json::from_str(json).unwrap();
        let summaries: Vec<MovieSummary> = response
            .hits
            .hits
            .into_iter()
            .map(|hit| MovieSummary::from(hit.source))
            .collect();

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].movie_id, 1);
        assert_eq!(summaries[1].genres, "Unknown");
    }
}
