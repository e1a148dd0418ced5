use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::{CatalogIndex, ExternalId};
use engine::SimilarityEngine;
use posters::PosterOutcome;
use rand::Rng;
use server::{Config, MovieRecommendation, RecommendationOrchestrator};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

/// movie-recs - similar-movie recommender with TMDB posters
#[derive(Parser)]
#[command(name = "movie-recs")]
#[command(about = "Recommend similar movies from a precomputed similarity matrix", long_about = None)]
struct Cli {
    /// Directory containing movies.dat and similarity.dat
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend movies similar to a title, with posters
    Recommend {
        /// Exact catalog title
        #[arg(long)]
        title: String,

        /// Print the recommendations as JSON
        #[arg(long)]
        json: bool,
    },

    /// List catalog titles
    Titles {
        /// Case-insensitive substring to match
        #[arg(long)]
        filter: Option<String>,

        /// Maximum number of titles to print
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Resolve a single poster
    Poster {
        /// TMDB id of the movie
        #[arg(long, conflicts_with = "title", required_unless_present = "title")]
        id: Option<ExternalId>,

        /// Catalog or free-form title
        #[arg(long)]
        title: Option<String>,
    },

    /// Read titles from stdin until `:quit`; `:clear` drops cached results
    Interactive,

    /// Time the similarity ranking on random titles (no network)
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "1000")]
        requests: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    println!("Loading catalog from {}...", cli.data_dir.display());
    let start = Instant::now();
    let catalog = Arc::new(
        CatalogIndex::load_from_files(&cli.data_dir).context("Failed to load catalog")?,
    );
    let (entries, with_id) = catalog.counts();
    println!(
        "{} Loaded {} titles ({} with TMDB ids) in {:?}",
        "✓".green(),
        entries,
        with_id,
        start.elapsed()
    );

    match cli.command {
        Commands::Recommend { title, json } => handle_recommend(catalog, title, json).await?,
        Commands::Titles { filter, limit } => handle_titles(&catalog, filter, limit),
        Commands::Poster { id, title } => handle_poster(catalog, id, title).await?,
        Commands::Interactive => handle_interactive(catalog).await?,
        Commands::Benchmark { requests } => handle_benchmark(catalog, requests)?,
    }

    Ok(())
}

fn build_orchestrator(catalog: Arc<CatalogIndex>) -> Result<RecommendationOrchestrator> {
    let config = Config::from_env().context("TMDB configuration is required for this command")?;
    RecommendationOrchestrator::from_config(catalog, &config)
}

/// Handle the 'recommend' command
async fn handle_recommend(catalog: Arc<CatalogIndex>, title: String, json: bool) -> Result<()> {
    let orchestrator = build_orchestrator(catalog)?;
    let recommendations = orchestrator.recommend(&title).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&recommendations)?);
    } else {
        print_recommendations(&title, &recommendations);
    }
    Ok(())
}

/// Handle the 'titles' command
fn handle_titles(catalog: &CatalogIndex, filter: Option<String>, limit: usize) {
    let needle = filter.map(|f| f.to_lowercase());
    let matches: Vec<_> = catalog
        .entries()
        .iter()
        .filter(|entry| match &needle {
            Some(needle) => entry.title.to_lowercase().contains(needle),
            None => true,
        })
        .collect();

    println!("{}", format!("{} matching titles:", matches.len()).bold().blue());
    for entry in matches.iter().take(limit) {
        let id = entry
            .external_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("  {} {}", format!("[{}]", id).dimmed(), entry.title);
    }
    if matches.len() > limit {
        println!("  ... {} more", matches.len() - limit);
    }
}

/// Handle the 'poster' command
async fn handle_poster(
    catalog: Arc<CatalogIndex>,
    id: Option<ExternalId>,
    title: Option<String>,
) -> Result<()> {
    let (external_id, title) = match (id, title) {
        (Some(id), _) => (Some(id), String::new()),
        (None, Some(title)) => {
            let external_id = catalog
                .position_of(&title)
                .and_then(|pos| catalog.get(pos))
                .and_then(|entry| entry.external_id);
            (external_id, title)
        }
        (None, None) => return Err(anyhow!("Either --id or --title is required")),
    };

    let orchestrator = build_orchestrator(catalog)?;
    let outcome = orchestrator.poster(external_id, &title).await;
    print_poster(&outcome);
    Ok(())
}

/// Handle the 'interactive' command
async fn handle_interactive(catalog: Arc<CatalogIndex>) -> Result<()> {
    let orchestrator = build_orchestrator(catalog)?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!(
        "Enter a movie title ({} to reset caches, {} to exit)",
        ":clear".cyan(),
        ":quit".cyan()
    );

    loop {
        print!("{} ", ">".bold());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match line.trim() {
            "" => continue,
            ":quit" | ":q" => break,
            ":clear" => {
                orchestrator.clear_cache().await;
                println!("{} Caches cleared", "✓".green());
            }
            title => {
                let start = Instant::now();
                match orchestrator.recommend(title).await {
                    Ok(recommendations) => {
                        print_recommendations(title, &recommendations);
                        println!("{}", format!("({:.2?})", start.elapsed()).dimmed());
                    }
                    Err(e) => {
                        warn!(title, "Recommendation failed");
                        println!("{} {}", "✗".red(), e);
                    }
                }
            }
        }
    }

    Ok(())
}

/// Handle the 'benchmark' command
fn handle_benchmark(catalog: Arc<CatalogIndex>, requests: usize) -> Result<()> {
    if catalog.is_empty() || requests == 0 {
        return Err(anyhow!("Benchmark needs a non-empty catalog and at least one request"));
    }

    let engine = SimilarityEngine::new(catalog.clone());
    let mut rng = rand::rng();

    let mut timings: Vec<Duration> = Vec::with_capacity(requests);
    for _ in 0..requests {
        let pos = rng.random_range(0..catalog.len());
        let title = catalog
            .get(pos)
            .map(|entry| entry.title.as_str())
            .context("Random position outside the catalog")?;

        let start = Instant::now();
        engine.recommend(title)?;
        timings.push(start.elapsed());
    }

    // Latency statistics
    let total_time: Duration = timings.iter().sum();
    let avg_latency = total_time / timings.len() as u32;
    timings.sort();
    let percentile = |p: f64| timings[((timings.len() as f64 * p) as usize).min(timings.len() - 1)];
    let throughput = requests as f64 / total_time.as_secs_f64().max(f64::EPSILON);

    println!("{}", "Benchmark results:".bold().blue());
    println!("Requests: {}", requests);
    println!("Total time: {:?}", total_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

/// Helper function to format and print recommendations
fn print_recommendations(title: &str, recommendations: &[MovieRecommendation]) {
    println!("{}", format!("Movies similar to '{}':", title).bold().blue());
    for rec in recommendations {
        let poster = if rec.has_poster {
            rec.poster_url.normal()
        } else {
            rec.poster_url.yellow()
        };
        println!(
            "{}. {} - Score: {:.3}",
            rec.rank.to_string().green(),
            rec.title,
            rec.score
        );
        println!("   {}", poster);
    }
}

fn print_poster(outcome: &PosterOutcome) {
    match outcome {
        PosterOutcome::Found(url) => println!("{} {}", "✓".green(), url),
        PosterOutcome::Placeholder(placeholder) => println!(
            "{} {:?}: {}",
            "✗".yellow(),
            placeholder,
            placeholder.url()
        ),
    }
}
