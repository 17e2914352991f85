use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Redis connection URL
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// Warehouse (BigQuery) REST API base URL
    #[serde(default = "default_warehouse_api_url")]
    pub warehouse_api_url: String,

    /// Warehouse project identifier
    pub warehouse_project: String,

    /// Warehouse dataset holding the movies, links and model objects
    #[serde(default = "default_warehouse_dataset")]
    pub warehouse_dataset: String,

    /// Name of the pre-trained matrix-factorization model
    #[serde(default = "default_warehouse_model")]
    pub warehouse_model: String,

    /// OAuth bearer token for the warehouse REST API
    pub warehouse_access_token: String,

    /// Search index endpoint URL
    pub search_api_url: String,

    /// Search index API key (base64, sent as an ApiKey authorization header)
    pub search_api_key: String,

    /// Name of the search index
    #[serde(default = "default_search_index")]
    pub search_index: String,

    /// Movie metadata API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Movie metadata API key
    pub tmdb_api_key: String,

    /// Base URL prefixed onto poster file paths
    #[serde(default = "default_tmdb_image_base_url")]
    pub tmdb_image_base_url: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_warehouse_api_url() -> String {
    "https://bigquery.googleapis.com/bigquery/v2".to_string()
}

fn default_warehouse_dataset() -> String {
    "movie_recommendation".to_string()
}

fn default_warehouse_model() -> String {
    "MF-model".to_string()
}

fn default_search_index() -> String {
    "movie_recommendation".to_string()
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_image_base_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}
