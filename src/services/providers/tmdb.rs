/// Movie metadata provider (TMDB-compatible REST API)
///
/// Two lookups, both keyed by the external metadata id: the primary poster
/// image and the plot overview. Absent data is reported as `None`; the
/// handlers decide which sentinel to substitute.
use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{TmdbDetails, TmdbId, TmdbImages},
    services::providers::MetadataProvider,
};
use reqwest::Client as HttpClient;

const METADATA_CACHE_TTL: u64 = 604800; // 1 week

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    image_base_url: String,
    cache: Cache,
}

impl TmdbProvider {
    pub fn new(cache: Cache, api_key: String, api_url: String, image_base_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
            image_base_url,
            cache,
        }
    }

    /// Builds the public URL for the first poster in the response
    fn primary_poster_url(&self, images: &TmdbImages) -> Option<String> {
        images
            .posters
            .first()
            .map(|poster| format!("{}{}", self.image_base_url, poster.file_path))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: String) -> AppResult<T> {
        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Metadata API returned status {}: {}",
                status, body
            )));
        }

        Ok(response.json().await?)
    }
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbProvider {
    async fn poster_url(&self, tmdb_id: TmdbId) -> AppResult<Option<String>> {
        cached!(
            self.cache,
            CacheKey::Poster(tmdb_id),
            METADATA_CACHE_TTL,
            async move {
                let url = format!("{}/movie/{}/images", self.api_url, tmdb_id);
                let images: TmdbImages = self.get_json(url).await?;
                let poster_url = self.primary_poster_url(&images);

                tracing::info!(
                    tmdb_id,
                    found = poster_url.is_some(),
                    provider = "tmdb",
                    "Poster lookup completed"
                );

                Ok::<_, AppError>(poster_url)
            }
        )
    }

    async fn overview(&self, tmdb_id: TmdbId) -> AppResult<Option<String>> {
        cached!(
            self.cache,
            CacheKey::Overview(tmdb_id),
            METADATA_CACHE_TTL,
            async move {
                let url = format!("{}/movie/{}", self.api_url, tmdb_id);
                let details: TmdbDetails = self.get_json(url).await?;

                tracing::info!(
                    tmdb_id,
                    found = details.overview.is_some(),
                    provider = "tmdb",
                    "Overview lookup completed"
                );

                Ok::<_, AppError>(details.overview)
            }
        )
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
