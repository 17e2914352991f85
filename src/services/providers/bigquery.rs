/// Warehouse provider (BigQuery REST API)
///
/// Serves two reads: the catalog join of the movies and links tables, and the
/// prediction table derived from the pre-trained matrix-factorization model.
/// Both go through the stateless `jobs.query` endpoint; responses carry a
/// schema block plus string-encoded cells that are decoded by column name.
use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{Movie, QueryResponse, TableCell, TableSchema, UserPredictions},
    services::providers::CatalogProvider,
};
use reqwest::Client as HttpClient;
use serde_json::json;
use std::collections::HashMap;

const CATALOG_CACHE_TTL: u64 = 600; // 10 minutes

/// Predictions kept per candidate user, by descending model confidence
const PREDICTIONS_PER_USER: u32 = 10;

#[derive(Clone)]
pub struct BigQueryProvider {
    http_client: HttpClient,
    api_url: String,
    project: String,
    dataset: String,
    model: String,
    access_token: String,
    cache: Cache,
}

impl BigQueryProvider {
    pub fn new(
        cache: Cache,
        api_url: String,
        project: String,
        dataset: String,
        model: String,
        access_token: String,
    ) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_url,
            project,
            dataset,
            model,
            access_token,
            cache,
        }
    }

    fn catalog_sql(&self) -> String {
        format!(
            "SELECT m.movieId, m.title, m.genres, l.imdbId, l.tmdbId \
             FROM `{project}.{dataset}.movies` m \
             INNER JOIN `{project}.{dataset}.links` l ON m.movieId = l.movieId",
            project = self.project,
            dataset = self.dataset,
        )
    }

    fn predictions_sql(&self) -> String {
        format!(
            "SELECT userId, movieId FROM ( \
             SELECT userId, movieId, predicted_rating_im_confidence, \
             ROW_NUMBER() OVER (PARTITION BY userId \
             ORDER BY predicted_rating_im_confidence DESC) AS rank \
             FROM ML.RECOMMEND(MODEL `{project}.{dataset}.{model}`)) \
             WHERE rank <= {limit} \
             ORDER BY userId, predicted_rating_im_confidence DESC",
            project = self.project,
            dataset = self.dataset,
            model = self.model,
            limit = PREDICTIONS_PER_USER,
        )
    }

    /// Runs one SQL statement through the stateless query endpoint
    async fn run_query(&self, sql: String) -> AppResult<QueryResponse> {
        let url = format!("{}/projects/{}/queries", self.api_url, self.project);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&json!({
                "query": sql,
                "useLegacySql": false,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Warehouse API returned status {}: {}",
                status, body
            )));
        }

        let query_response: QueryResponse = response.json().await?;

        if query_response.job_complete == Some(false) {
            return Err(AppError::ExternalApi(
                "Warehouse query did not complete within the request window".to_string(),
            ));
        }

        Ok(query_response)
    }

    /// Maps column names to their position in the row cells
    fn column_indices(schema: &TableSchema) -> HashMap<&str, usize> {
        schema
            .fields
            .iter()
            .enumerate()
            .map(|(index, field)| (field.name.as_str(), index))
            .collect()
    }

    fn require_schema(response: &QueryResponse) -> AppResult<&TableSchema> {
        response
            .schema
            .as_ref()
            .ok_or_else(|| AppError::ExternalApi("Warehouse response missing schema".to_string()))
    }

    fn require_column(columns: &HashMap<&str, usize>, name: &str) -> AppResult<usize> {
        columns.get(name).copied().ok_or_else(|| {
            AppError::ExternalApi(format!("Warehouse response missing {} column", name))
        })
    }

    /// Decodes catalog rows into movies
    ///
    /// Rows missing their key columns are dropped rather than failing the
    /// whole load; absent link ids stay `None`.
    fn parse_catalog(response: &QueryResponse) -> AppResult<Vec<Movie>> {
        let schema = Self::require_schema(response)?;
        let columns = Self::column_indices(schema);

        let movie_id_col = Self::require_column(&columns, "movieId")?;
        let title_col = Self::require_column(&columns, "title")?;
        let genres_col = Self::require_column(&columns, "genres")?;
        let imdb_id_col = Self::require_column(&columns, "imdbId")?;
        let tmdb_id_col = Self::require_column(&columns, "tmdbId")?;

        let mut movies = Vec::with_capacity(response.rows.len());
        let mut dropped = 0usize;

        for row in &response.rows {
            let movie_id = row.f.get(movie_id_col).and_then(TableCell::as_i64);
            let title = row.f.get(title_col).and_then(TableCell::as_str);

            match (movie_id, title) {
                (Some(movie_id), Some(title)) => movies.push(Movie {
                    movie_id,
                    title: title.to_string(),
                    genres: row
                        .f
                        .get(genres_col)
                        .and_then(TableCell::as_str)
                        .unwrap_or("Unknown")
                        .to_string(),
                    imdb_id: row.f.get(imdb_id_col).and_then(TableCell::as_i64),
                    tmdb_id: row.f.get(tmdb_id_col).and_then(TableCell::as_i64),
                }),
                _ => dropped += 1,
            }
        }

        if dropped > 0 {
            tracing::warn!(dropped, "Dropped malformed catalog rows");
        }

        Ok(movies)
    }

    /// Groups prediction rows into one entry per candidate user
    ///
    /// Rows arrive ordered by user then confidence descending; both the user
    /// order and each user's prediction order are preserved.
    fn parse_predictions(response: &QueryResponse) -> AppResult<Vec<UserPredictions>> {
        let schema = Self::require_schema(response)?;
        let columns = Self::column_indices(schema);

        let user_id_col = Self::require_column(&columns, "userId")?;
        let movie_id_col = Self::require_column(&columns, "movieId")?;

        let mut table: Vec<UserPredictions> = Vec::new();

        for row in &response.rows {
            let user_id = row.f.get(user_id_col).and_then(TableCell::as_i64);
            let movie_id = row.f.get(movie_id_col).and_then(TableCell::as_i64);

            if let (Some(user_id), Some(movie_id)) = (user_id, movie_id) {
                match table.last_mut() {
                    Some(entry) if entry.user_id == user_id => entry.predictions.push(movie_id),
                    _ => table.push(UserPredictions {
                        user_id,
                        predictions: vec![movie_id],
                    }),
                }
            }
        }

        Ok(table)
    }
}

#[async_trait::async_trait]
impl CatalogProvider for BigQueryProvider {
    async fn load_catalog(&self) -> AppResult<Vec<Movie>> {
        cached!(self.cache, CacheKey::Catalog, CATALOG_CACHE_TTL, async move {
            let response = self.run_query(self.catalog_sql()).await?;
            let movies = Self::parse_catalog(&response)?;

            tracing::info!(
                movies = movies.len(),
                provider = "bigquery",
                "Catalog loaded"
            );

            Ok::<_, AppError>(movies)
        })
    }

    async fn top_predictions(&self) -> AppResult<Vec<UserPredictions>> {
        // Model output is re-read on every request, never cached
        let response = self.run_query(self.predictions_sql()).await?;
        let table = Self::parse_predictions(&response)?;

        tracing::info!(
            users = table.len(),
            provider = "bigquery",
            "Prediction table fetched"
        );

        Ok(table)
    }

    fn name(&self) -> &'static str {
        "bigquery"
    }
}
