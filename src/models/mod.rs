use serde::{Deserialize, Serialize};

/// Catalog-scoped movie identifier
pub type MovieId = i64;

/// Identifier of a candidate user in the prediction table
pub type UserId = i64;

/// Identifier in the external metadata API's id space
pub type TmdbId = i64;

/// A catalog entry: the warehouse join of the movies and links tables
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub movie_id: MovieId,
    pub title: String,
    /// Pipe-separated genre tags, as stored in the warehouse
    pub genres: String,
    /// External metadata ids; either may be missing from the links table
    pub imdb_id: Option<i64>,
    pub tmdb_id: Option<i64>,
}

/// A search hit returned to the client: just enough to render an autocomplete row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MovieSummary {
    pub movie_id: MovieId,
    pub title: String,
    pub genres: String,
}

/// One row of the prediction table: a candidate user and their top predicted
/// movies, ordered by the model's confidence descending
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserPredictions {
    pub user_id: UserId,
    pub predictions: Vec<MovieId>,
}

// ============================================================================
// Warehouse REST API Types
// ============================================================================

/// Response body of the warehouse `jobs.query` endpoint
///
/// Cell values arrive as JSON strings regardless of the column type and are
/// decoded by schema position, not by name.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    #[serde(default)]
    pub schema: Option<TableSchema>,
    #[serde(default)]
    pub rows: Vec<TableRow>,
    #[serde(default)]
    pub job_complete: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TableSchema {
    pub fields: Vec<TableField>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TableField {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TableRow {
    pub f: Vec<TableCell>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TableCell {
    #[serde(default)]
    pub v: serde_json::Value,
}

impl TableCell {
    /// Decodes the cell as an integer, tolerating the string encoding the
    /// warehouse uses for numeric columns
    pub fn as_i64(&self) -> Option<i64> {
        match &self.v {
            serde_json::Value::String(s) => s.parse().ok(),
            serde_json::Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    /// Decodes the cell as a string, returning `None` for nulls
    pub fn as_str(&self) -> Option<&str> {
        self.v.as_str()
    }
}

// ============================================================================
// Search Index Types
// ============================================================================

/// Envelope of a search index `_search` response
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub hits: SearchHits,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchHits {
    #[serde(default)]
    pub hits: Vec<SearchHit>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    #[serde(rename = "_source")]
    pub source: IndexedMovie,
}

/// The document shape stored in the search index
#[derive(Debug, Clone, Deserialize)]
pub struct IndexedMovie {
    #[serde(rename = "movieId")]
    pub movie_id: MovieId,
    pub title: String,
    #[serde(default)]
    pub genres: Option<String>,
}

impl From<IndexedMovie> for MovieSummary {
    fn from(doc: IndexedMovie) -> Self {
        MovieSummary {
            movie_id: doc.movie_id,
            title: doc.title,
            // Older index documents predate the genres field
            genres: doc.genres.unwrap_or_else(|| "Unknown".to_string()),
        }
    }
}

// ============================================================================
// Metadata API Types
// ============================================================================

/// Response of the metadata API images endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbImages {
    #[serde(default)]
    pub posters: Vec<TmdbPoster>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbPoster {
    pub file_path: String,
}

/// Response of the metadata API movie details endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbDetails {
    #[serde(default)]
    pub overview: Option<String>,
}
