use anyhow::Context;
use data_loader::CatalogIndex;
use std::path::Path;
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    let data_dir = Path::new("data");

    println!("Loading catalog and similarity matrix...\n");

    let start = Instant::now();
    let index = CatalogIndex::load_from_files(data_dir).context("Failed to load dataset")?;
    let elapsed = start.elapsed();

    let (entries, with_id) = index.counts();

    println!("=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Entries: {}", entries);
    println!("Entries with TMDB id: {}", with_id);
    println!("Similarity scores: {}", entries * entries);
    println!(
        "\nPerformance: {:.0} scores/second",
        (entries * entries) as f64 / elapsed.as_secs_f64()
    );

    Ok(())
}
