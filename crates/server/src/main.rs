//! Smoke-test harness for the recommendation orchestrator.
//!
//! Loads the dataset from `data/`, reads TMDB settings from the environment
//! and prints recommendations for the title given as the first argument.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use data_loader::CatalogIndex;
use server::{Config, RecommendationOrchestrator};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("info,server=debug,posters=debug,tmdb_client=debug")
        .init();

    let config = Config::from_env()?;

    info!("Loading catalog...");
    let catalog = Arc::new(
        CatalogIndex::load_from_files(Path::new("data")).context("Failed to load catalog")?,
    );

    let title = match std::env::args().nth(1) {
        Some(title) => title,
        None => catalog
            .get(0)
            .map(|entry| entry.title.clone())
            .context("Catalog is empty")?,
    };

    let orchestrator = RecommendationOrchestrator::from_config(catalog, &config)?;

    info!("Getting recommendations for '{}'", title);
    let recommendations = orchestrator.recommend(&title).await?;

    for rec in &recommendations {
        info!(
            "{}. {} - Score: {:.3} [{}]",
            rec.rank, rec.title, rec.score, rec.poster_url
        );
    }

    Ok(())
}
