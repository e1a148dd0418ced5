//! # Recommendation Orchestrator
//!
//! Ties the pieces together for one query title:
//! 1. Rank similar titles with the `SimilarityEngine` (no network)
//! 2. Resolve a poster for each pick, one after another with a short pause
//! 3. Memoize the finished batch per title
//!
//! An unknown title fails before any external call is made.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use data_loader::{CatalogIndex, ExternalId};
use engine::{RankedMovie, RecommendError, SimilarityEngine};
use posters::{MemoCache, PosterOutcome, PosterResolver};
use tmdb_client::TmdbClient;

use crate::config::Config;

/// Pause between consecutive poster resolutions of one batch
pub const DEFAULT_INTER_CALL_DELAY: Duration = Duration::from_millis(200);

/// Final recommendation returned to the caller
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieRecommendation {
    pub rank: usize,
    pub title: String,
    pub external_id: Option<ExternalId>,
    pub score: f32,
    /// Always a displayable URL, possibly a placeholder
    pub poster_url: String,
    pub has_poster: bool,
}

impl MovieRecommendation {
    fn new(rank: usize, movie: RankedMovie, poster: &PosterOutcome) -> Self {
        Self {
            rank,
            title: movie.title,
            external_id: movie.external_id,
            score: movie.score,
            poster_url: poster.url(),
            has_poster: poster.is_found(),
        }
    }
}

/// Coordinates ranking and poster resolution
#[derive(Clone)]
pub struct RecommendationOrchestrator {
    engine: SimilarityEngine,
    resolver: PosterResolver,
    inter_call_delay: Duration,
    recommendations: MemoCache<String, Arc<Vec<MovieRecommendation>>>,
}

impl RecommendationOrchestrator {
    /// Create an orchestrator over a loaded catalog and a poster resolver
    pub fn new(catalog: Arc<CatalogIndex>, resolver: PosterResolver) -> Self {
        Self {
            engine: SimilarityEngine::new(catalog),
            resolver,
            inter_call_delay: DEFAULT_INTER_CALL_DELAY,
            recommendations: MemoCache::new(),
        }
    }

    /// Build the full TMDB-backed stack from configuration
    pub fn from_config(catalog: Arc<CatalogIndex>, config: &Config) -> Result<Self> {
        let client = Arc::new(
            TmdbClient::new(config.tmdb_settings()).context("Failed to build TMDB client")?,
        );
        let resolver = PosterResolver::new(
            client.clone(),
            client,
            config.resolver_settings(),
        );

        Ok(Self::new(catalog, resolver)
            .with_limit(config.recommendation_count)
            .with_inter_call_delay(config.inter_call_delay()))
    }

    /// Configure how many titles each recommendation returns
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.engine = self.engine.with_limit(limit);
        self
    }

    /// Configure the pause between consecutive poster resolutions
    pub fn with_inter_call_delay(mut self, delay: Duration) -> Self {
        self.inter_call_delay = delay;
        self
    }

    pub fn catalog(&self) -> &Arc<CatalogIndex> {
        self.engine.catalog()
    }

    pub fn engine(&self) -> &SimilarityEngine {
        &self.engine
    }

    pub fn resolver(&self) -> &PosterResolver {
        &self.resolver
    }

    /// Main entry point: similar titles with their posters, best first
    pub async fn recommend(
        &self,
        title: &str,
    ) -> std::result::Result<Vec<MovieRecommendation>, RecommendError> {
        if let Some(cached) = self.recommendations.get(title).await {
            debug!(title, "Recommendation cache hit");
            return Ok(cached.as_ref().clone());
        }

        let start_time = Instant::now();

        let ranked = self.engine.recommend(title)?;
        info!("Ranked {} similar titles for '{}'", ranked.len(), title);

        let mut recommendations = Vec::with_capacity(ranked.len());
        let mut cacheable = true;
        for (i, movie) in ranked.into_iter().enumerate() {
            if i > 0 && !self.inter_call_delay.is_zero() {
                tokio::time::sleep(self.inter_call_delay).await;
            }

            let poster = self
                .resolver
                .resolve_poster(movie.external_id, &movie.title)
                .await;
            cacheable &= poster.is_cacheable();
            recommendations.push(MovieRecommendation::new(i + 1, movie, &poster));
        }

        let found = recommendations.iter().filter(|r| r.has_poster).count();
        info!(
            "Resolved {}/{} posters for '{}' in {:.2?}",
            found,
            recommendations.len(),
            title,
            start_time.elapsed()
        );

        // Batches with a transient poster failure are retried on the next call
        if cacheable {
            self.recommendations
                .insert(title.to_string(), Arc::new(recommendations.clone()))
                .await;
        }

        Ok(recommendations)
    }

    /// Poster for a single catalog entry or a free-form title
    pub async fn poster(&self, external_id: Option<ExternalId>, title: &str) -> PosterOutcome {
        self.resolver.resolve_poster(external_id, title).await
    }

    /// Drop every memoized recommendation, poster and id lookup
    pub async fn clear_cache(&self) {
        self.recommendations.clear().await;
        self.resolver.clear().await;
        info!("Cleared recommendation and poster caches");
    }
}
