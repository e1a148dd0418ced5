//! Benchmarks for similarity ranking
//!
//! Run with: cargo bench --package engine
//!
//! Uses a synthetic catalog so it runs without the dataset on disk.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use data_loader::{CatalogEntry, CatalogIndex, SimilarityMatrix};
use engine::SimilarityEngine;
use std::sync::Arc;

const CATALOG_SIZE: usize = 2000;

fn build_engine() -> SimilarityEngine {
    let entries = (0..CATALOG_SIZE)
        .map(|i| CatalogEntry::new(format!("Movie {i}"), Some(i as u64)))
        .collect();

    let rows = (0..CATALOG_SIZE)
        .map(|i| {
            (0..CATALOG_SIZE)
                .map(|j| ((i * 31 + j * 17) % 1000) as f32 / 1000.0)
                .collect()
        })
        .collect();

    let matrix = SimilarityMatrix::from_rows(rows).expect("synthetic matrix is square");
    let index = CatalogIndex::from_parts(entries, matrix).expect("synthetic catalog is valid");
    SimilarityEngine::new(Arc::new(index))
}

fn bench_recommend(c: &mut Criterion) {
    let engine = build_engine();

    c.bench_function("recommend_top5", |b| {
        b.iter(|| {
            let recs = engine.recommend(black_box("Movie 1234")).unwrap();
            black_box(recs)
        })
    });
}

fn bench_rank(c: &mut Criterion) {
    let engine = build_engine();

    c.bench_function("rank_full_row", |b| {
        b.iter(|| {
            let ranked = engine.rank(black_box(42));
            black_box(ranked)
        })
    });
}

criterion_group!(benches, bench_recommend, bench_rank);
criterion_main!(benches);
