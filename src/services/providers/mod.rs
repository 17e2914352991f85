/// Upstream service provider abstractions
///
/// Each of the three external collaborators sits behind its own trait so that
/// handlers depend only on the seam: the warehouse holding the catalog and the
/// recommendation model's output, the full-text index answering title
/// autocomplete, and the metadata API serving posters and overviews.
///
/// Trait objects keep the wiring swappable (and mockable in tests) without the
/// handlers knowing which vendor is behind a seam.
use crate::{
    error::AppResult,
    models::{Movie, MovieSummary, TmdbId, UserPredictions},
};

pub mod bigquery;
pub mod elastic;
pub mod tmdb;

pub use bigquery::BigQueryProvider;
pub use elastic::ElasticProvider;
pub use tmdb::TmdbProvider;

/// Warehouse access: the catalog join and the model's prediction table
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Loads the full catalog (movies joined with their external metadata ids)
    async fn load_catalog(&self) -> AppResult<Vec<Movie>>;

    /// Fetches the prediction table: each candidate user's top predicted
    /// movies, ordered by the model's confidence descending
    ///
    /// The table is re-read on every call; it is model output, not state owned
    /// by this service.
    async fn top_predictions(&self) -> AppResult<Vec<UserPredictions>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Full-text title search
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SearchProvider: Send + Sync {
    /// Prefix-matches titles against the index, capped at 50 hits
    async fn search_titles(&self, query: &str) -> AppResult<Vec<MovieSummary>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Poster and plot-overview lookups by external metadata id
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Resolves the primary poster URL, `None` when the title has no posters
    async fn poster_url(&self, tmdb_id: TmdbId) -> AppResult<Option<String>>;

    /// Fetches the plot overview, `None` when the title has none
    async fn overview(&self, tmdb_id: TmdbId) -> AppResult<Option<String>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
