//! HTTP client for The Movie Database (TMDB).
//!
//! This crate covers the two external collaborators the poster resolver
//! talks to:
//! - the metadata service (`/search/movie` and `/movie/{id}`), behind the
//!   [`MetadataService`] trait
//! - the image asset host, behind the [`AssetHost`] trait
//!
//! [`TmdbClient`] implements both over `reqwest`. Every request carries its
//! own timeout; the API key is sent as a query parameter and is stripped from
//! error messages before they reach the logs.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

pub mod models;

pub use models::{MovieDetails, PaginatedResponse, SearchResult, TmdbId};

pub const DEFAULT_API_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_IMAGE_URL: &str = "https://image.tmdb.org/t/p/w500";
pub const DEFAULT_LANGUAGE: &str = "en-US";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_ASSET_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors that can occur when talking to TMDB or the image host
#[derive(Error, Debug)]
pub enum TmdbError {
    #[error("HTTP request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("HTTP request timed out")]
    Timeout,

    #[error("TMDB API returned status {status_code}: {message}")]
    Api { status_code: u16, message: String },
}

impl From<reqwest::Error> for TmdbError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            return TmdbError::Timeout;
        }
        // Request URLs carry the api_key query parameter
        TmdbError::Request(error.without_url())
    }
}

impl TmdbError {
    /// True when the request gave up because its timeout elapsed
    pub fn is_timeout(&self) -> bool {
        matches!(self, TmdbError::Timeout)
    }
}

pub type Result<T> = std::result::Result<T, TmdbError>;

/// Metadata lookups used by the poster resolver
#[async_trait]
pub trait MetadataService: Send + Sync {
    /// Identifier of the best match for `title`, `None` if the search is empty
    async fn search(&self, title: &str) -> Result<Option<TmdbId>>;

    /// Movie details (including the poster path) for an identifier
    async fn get_metadata(&self, id: TmdbId) -> Result<MovieDetails>;
}

/// Existence checks against the image host
#[async_trait]
pub trait AssetHost: Send + Sync {
    /// True when a HEAD request for `url` answers 200 OK
    async fn exists(&self, url: &str) -> Result<bool>;
}

/// Connection settings for [`TmdbClient`]
#[derive(Debug, Clone)]
pub struct TmdbSettings {
    pub api_key: String,
    pub api_url: String,
    pub language: String,
    pub request_timeout: Duration,
    pub asset_timeout: Duration,
}

impl TmdbSettings {
    /// Settings pointing at the public TMDB API with default timeouts
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_url: DEFAULT_API_URL.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            asset_timeout: DEFAULT_ASSET_TIMEOUT,
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_asset_timeout(mut self, timeout: Duration) -> Self {
        self.asset_timeout = timeout;
        self
    }
}

/// reqwest-backed client for the TMDB v3 API and its image CDN
#[derive(Debug, Clone)]
pub struct TmdbClient {
    http: Client,
    settings: TmdbSettings,
}

impl TmdbClient {
    /// Build a client with its own connection pool
    pub fn new(settings: TmdbSettings) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("movie-recs/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(http, settings))
    }

    /// Build a client around an existing reqwest client
    pub fn with_client(http: Client, settings: TmdbSettings) -> Self {
        Self { http, settings }
    }

    pub fn settings(&self) -> &TmdbSettings {
        &self.settings
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.settings.api_url.trim_end_matches('/'), path)
    }

    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(TmdbError::Api {
                status_code: status.as_u16(),
                message,
            });
        }
        Ok(response.json().await?)
    }

    /// Raw `/search/movie` call
    pub async fn search_movies(&self, query: &str) -> Result<PaginatedResponse<SearchResult>> {
        debug!(query, "Searching TMDB");
        let response = self
            .http
            .get(self.url("/search/movie"))
            .query(&[
                ("api_key", self.settings.api_key.as_str()),
                ("query", query),
                ("language", self.settings.language.as_str()),
            ])
            .timeout(self.settings.request_timeout)
            .send()
            .await?;

        Self::handle_response(response).await
    }

    /// Raw `/movie/{id}` call
    pub async fn movie_details(&self, id: TmdbId) -> Result<MovieDetails> {
        debug!(id, "Fetching TMDB movie details");
        let response = self
            .http
            .get(self.url(&format!("/movie/{}", id)))
            .query(&[
                ("api_key", self.settings.api_key.as_str()),
                ("language", self.settings.language.as_str()),
            ])
            .timeout(self.settings.request_timeout)
            .send()
            .await?;

        Self::handle_response(response).await
    }

    /// Status code of a HEAD request against `url`
    pub async fn head(&self, url: &str) -> Result<StatusCode> {
        let response = self
            .http
            .head(url)
            .timeout(self.settings.asset_timeout)
            .send()
            .await?;
        Ok(response.status())
    }
}

#[async_trait]
impl MetadataService for TmdbClient {
    async fn search(&self, title: &str) -> Result<Option<TmdbId>> {
        let response = self.search_movies(title).await?;
        Ok(response.results.first().map(|result| result.id))
    }

    async fn get_metadata(&self, id: TmdbId) -> Result<MovieDetails> {
        self.movie_details(id).await
    }
}

#[async_trait]
impl AssetHost for TmdbClient {
    async fn exists(&self, url: &str) -> Result<bool> {
        Ok(self.head(url).await? == StatusCode::OK)
    }
}
