//! Poster Resolver - external id to a displayable image URL
//!
//! ## Flow
//! 1. Missing id: look the title up once; no result means `NoIdentifier`,
//!    a failed search means `Unavailable`
//! 2. Fetch metadata, retrying transport failures with a fixed backoff
//! 3. No poster path means `NoPoster`, without another attempt
//! 4. HEAD the full image URL; only a 200 yields the real URL
//!
//! Every branch ends in a URL. Failures are logged, never returned.

use crate::cache::MemoCache;
use crate::placeholder::{Absence, Placeholder, PosterOutcome};
use data_loader::ExternalId;
use std::sync::Arc;
use std::time::Duration;
use tmdb_client::{AssetHost, DEFAULT_IMAGE_URL, MetadataService, MovieDetails, TmdbError};
use tracing::{debug, instrument, warn};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_secs(1);

/// Retry and URL settings for [`PosterResolver`]
#[derive(Debug, Clone)]
pub struct ResolverSettings {
    /// Metadata attempts per id, including the first one
    pub max_attempts: u32,
    /// Pause between failed metadata attempts
    pub retry_backoff: Duration,
    /// Prefix joined with the metadata's poster path
    pub image_base_url: String,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
            image_base_url: DEFAULT_IMAGE_URL.to_string(),
        }
    }
}

/// Resolves posters through a metadata service and an asset host
#[derive(Clone)]
pub struct PosterResolver {
    metadata: Arc<dyn MetadataService>,
    assets: Arc<dyn AssetHost>,
    settings: ResolverSettings,
    posters: MemoCache<ExternalId, PosterOutcome>,
    ids: MemoCache<String, Option<ExternalId>>,
}

impl PosterResolver {
    pub fn new(
        metadata: Arc<dyn MetadataService>,
        assets: Arc<dyn AssetHost>,
        settings: ResolverSettings,
    ) -> Self {
        Self {
            metadata,
            assets,
            settings,
            posters: MemoCache::new(),
            ids: MemoCache::new(),
        }
    }

    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    /// Poster for a catalog entry, falling back to a title lookup when the
    /// entry carries no external id
    #[instrument(skip(self))]
    pub async fn resolve_poster(
        &self,
        external_id: Option<ExternalId>,
        title: &str,
    ) -> PosterOutcome {
        let id = match external_id {
            Some(id) => id,
            None => match self.search_id(title).await {
                Ok(Some(id)) => id,
                Ok(None) => {
                    warn!(title, "No identifier found; using placeholder");
                    return Placeholder::NoIdentifier.into();
                }
                Err(e) => {
                    warn!(title, error = %e, "Title lookup failed");
                    return Placeholder::Unavailable.into();
                }
            },
        };

        self.resolve_by_id(id).await
    }

    /// Poster for a known external id, memoized per id
    pub async fn resolve_by_id(&self, id: ExternalId) -> PosterOutcome {
        if let Some(outcome) = self.posters.get(&id).await {
            debug!(external_id = id, "Poster cache hit");
            return outcome;
        }

        let outcome = self.fetch_poster(id).await;
        if outcome.is_cacheable() {
            self.posters.insert(id, outcome.clone()).await;
        }
        outcome
    }

    /// External id for a title: first search result, memoized per title.
    ///
    /// Search errors yield `None` and are not memoized.
    pub async fn lookup_id(&self, title: &str) -> Option<ExternalId> {
        match self.search_id(title).await {
            Ok(id) => id,
            Err(e) => {
                warn!(title, error = %e, "Title lookup failed");
                None
            }
        }
    }

    async fn search_id(&self, title: &str) -> Result<Option<ExternalId>, TmdbError> {
        if let Some(id) = self.ids.get(title).await {
            return Ok(id);
        }

        let id = self.metadata.search(title).await?;
        debug!(title, ?id, "Title lookup finished");
        self.ids.insert(title.to_string(), id).await;
        Ok(id)
    }

    /// Drop every memoized poster and id lookup
    pub async fn clear(&self) {
        self.posters.clear().await;
        self.ids.clear().await;
    }

    /// Number of memoized posters and id lookups
    pub async fn cached(&self) -> (usize, usize) {
        (self.posters.len().await, self.ids.len().await)
    }

    async fn fetch_poster(&self, id: ExternalId) -> PosterOutcome {
        let Some(details) = self.fetch_metadata(id).await else {
            return Placeholder::Unavailable.into();
        };

        let Some(path) = details.poster_path() else {
            warn!(external_id = id, "Metadata has no poster path");
            return Absence::NoPoster.into();
        };

        let url = poster_url(&self.settings.image_base_url, path);
        match self.assets.exists(&url).await {
            Ok(true) => PosterOutcome::Found(url),
            Ok(false) => {
                warn!(external_id = id, url = %url, "Poster asset not found");
                Absence::AssetMissing.into()
            }
            Err(e) => {
                warn!(external_id = id, error = %e, "Poster asset check failed");
                Placeholder::Unavailable.into()
            }
        }
    }

    async fn fetch_metadata(&self, id: ExternalId) -> Option<MovieDetails> {
        let max_attempts = self.settings.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            match self.metadata.get_metadata(id).await {
                Ok(details) => return Some(details),
                Err(e) => {
                    warn!(
                        external_id = id,
                        attempt,
                        max_attempts,
                        timeout = e.is_timeout(),
                        error = %e,
                        "Metadata request failed"
                    );
                    if attempt < max_attempts {
                        tokio::time::sleep(self.settings.retry_backoff).await;
                    }
                }
            }
        }

        None
    }
}

fn poster_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
