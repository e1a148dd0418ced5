//! Response types for the TMDB endpoints the recommender uses.

use serde::{Deserialize, Serialize};

/// TMDB movie identifier
pub type TmdbId = u64;

/// Envelope of every paginated TMDB listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    #[serde(default)]
    pub page: i64,
    pub results: Vec<T>,
    #[serde(default)]
    pub total_pages: i64,
    #[serde(default)]
    pub total_results: i64,
}

/// One hit from `/search/movie`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: TmdbId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

/// Body of `/movie/{id}`; only the fields the resolver reads are kept
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieDetails {
    pub id: TmdbId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    /// Relative image path such as "/kqjL17yufvn9OVLyXYpvtyrFfak.jpg"
    #[serde(default)]
    pub poster_path: Option<String>,
}

impl MovieDetails {
    /// Poster path, treating an empty string the same as a missing one
    pub fn poster_path(&self) -> Option<&str> {
        self.poster_path
            .as_deref()
            .map(str::trim)
            .filter(|path| !path.is_empty())
    }
}
