//! Similarity Engine - top-k nearest titles
//!
//! ## Algorithm
//! 1. Locate the catalog position of the queried title (first exact match)
//! 2. Pair every score in its similarity row with the column index
//! 3. Stable sort by score, highest first, so equal scores keep index order
//! 4. Skip the queried movie itself and take the next `limit` entries
//! 5. Resolve each pick to its title and external id

use crate::error::{RecommendError, Result};
use crate::types::{Candidate, RankedMovie};
use data_loader::{CatalogIndex, EntryIndex};
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Number of recommendations returned by default
pub const DEFAULT_LIMIT: usize = 5;

/// Ranks catalog entries by precomputed similarity to a query title
#[derive(Debug, Clone)]
pub struct SimilarityEngine {
    /// Shared reference to the catalog (read-only, so no lock needed)
    index: Arc<CatalogIndex>,

    /// How many titles `recommend` returns
    limit: usize,
}

impl SimilarityEngine {
    /// Create a new engine over a loaded catalog
    pub fn new(index: Arc<CatalogIndex>) -> Self {
        Self {
            index,
            limit: DEFAULT_LIMIT,
        }
    }

    /// Configure how many titles to return (default: 5)
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn catalog(&self) -> &Arc<CatalogIndex> {
        &self.index
    }

    /// Most similar other titles for `title`, best first.
    ///
    /// Returns fewer than `limit` entries only when the catalog is too small.
    /// Fails with `NotFound` when no entry carries exactly this title.
    #[instrument(skip(self), fields(limit = self.limit))]
    pub fn recommend(&self, title: &str) -> Result<Vec<RankedMovie>> {
        let query = self
            .index
            .position_of(title)
            .ok_or_else(|| RecommendError::NotFound {
                title: title.to_string(),
            })?;

        let recommendations: Vec<RankedMovie> = self
            .rank(query)
            .into_iter()
            .filter(|candidate| candidate.index != query)
            .filter_map(|candidate| {
                let entry = self.index.get(candidate.index)?;
                // Duplicate rows of the query title never count as "similar"
                if entry.title == title {
                    return None;
                }
                Some(RankedMovie {
                    index: candidate.index,
                    title: entry.title.clone(),
                    external_id: entry.external_id,
                    score: candidate.score,
                })
            })
            .take(self.limit)
            .collect();

        debug!(
            query_index = query,
            returned = recommendations.len(),
            "Ranked similar titles"
        );
        Ok(recommendations)
    }

    /// Full similarity row of `query`, sorted highest score first.
    ///
    /// The query itself is included. Ties keep catalog order and NaN scores
    /// sort last. Out-of-range positions yield an empty ranking.
    pub fn rank(&self, query: EntryIndex) -> Vec<Candidate> {
        let Some(row) = self.index.similarity_row(query) else {
            return Vec::new();
        };

        let mut candidates: Vec<Candidate> = row
            .iter()
            .enumerate()
            .map(|(index, &score)| Candidate::new(index, score))
            .collect();

        // sort_by is stable
        candidates.sort_by(|a, b| compare_descending(a.score, b.score));
        candidates
    }
}

/// Descending order on scores with NaN treated as the lowest value
fn compare_descending(a: f32, b: f32) -> Ordering {
    let key = |score: f32| if score.is_nan() { f32::NEG_INFINITY } else { score };
    key(b).partial_cmp(&key(a)).unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::{CatalogEntry, SimilarityMatrix};

    fn engine_for(titles: &[(&str, Option<u64>)], rows: Vec<Vec<f32>>) -> SimilarityEngine {
        let entries = titles
            .iter()
            .map(|(title, id)| CatalogEntry::new(*title, *id))
            .collect();
        let matrix = SimilarityMatrix::from_rows(rows).unwrap();
        SimilarityEngine::new(Arc::new(CatalogIndex::from_parts(entries, matrix).unwrap()))
    }

    fn identity_with_row0(row0: Vec<f32>) -> Vec<Vec<f32>> {
        let n = row0.len();
        let mut rows = vec![row0];
        for i in 1..n {
            let mut row = vec![0.0; n];
            row[i] = 1.0;
            rows.push(row);
        }
        rows
    }

    #[test]
    fn test_recommend_orders_by_descending_score() {
        let engine = engine_for(
            &[
                ("Alpha", Some(1)),
                ("Beta", Some(2)),
                ("Gamma", None),
                ("Delta", Some(4)),
                ("Epsilon", Some(5)),
                ("Zeta", Some(6)),
            ],
            identity_with_row0(vec![1.0, 0.9, 0.8, 0.7, 0.6, 0.5]),
        );

        let recs = engine.recommend("Alpha").unwrap();
        let titles: Vec<&str> = recs.iter().map(|r| r.title.as_str()).collect();

        assert_eq!(titles, vec!["Beta", "Gamma", "Delta", "Epsilon", "Zeta"]);
        assert_eq!(recs[1].external_id, None);
        assert_eq!(recs[0].external_id, Some(2));
    }

    #[test]
    fn test_recommend_breaks_ties_by_catalog_order() {
        let engine = engine_for(
            &[
                ("Q", None),
                ("A", None),
                ("B", None),
                ("C", None),
                ("D", None),
                ("E", None),
                ("F", None),
            ],
            identity_with_row0(vec![1.0, 0.5, 0.9, 0.5, 0.5, 0.9, 0.5]),
        );

        let recs = engine.recommend("Q").unwrap();
        let indices: Vec<usize> = recs.iter().map(|r| r.index).collect();

        assert_eq!(indices, vec![2, 5, 1, 3, 4]);
    }

    #[test]
    fn test_recommend_excludes_query_even_when_neighbour_ties_self() {
        let engine = engine_for(
            &[("A", None), ("Q", None), ("B", None), ("C", None)],
            vec![
                vec![1.0, 0.0, 0.0, 0.0],
                vec![1.0, 1.0, 0.4, 0.3],
                vec![0.0, 0.0, 1.0, 0.0],
                vec![0.0, 0.0, 0.0, 1.0],
            ],
        );

        let recs = engine.recommend("Q").unwrap();
        let titles: Vec<&str> = recs.iter().map(|r| r.title.as_str()).collect();

        assert_eq!(titles, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_recommend_small_catalog_returns_fewer() {
        let engine = engine_for(
            &[("A", None), ("B", None), ("C", None)],
            vec![
                vec![1.0, 0.2, 0.8],
                vec![0.2, 1.0, 0.1],
                vec![0.8, 0.1, 1.0],
            ],
        );

        let recs = engine.recommend("A").unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].title, "C");
        assert_eq!(recs[1].title, "B");
    }

    #[test]
    fn test_recommend_unknown_title_fails() {
        let engine = engine_for(&[("A", None)], vec![vec![1.0]]);

        let err = engine.recommend("Nope").unwrap_err();
        assert_eq!(
            err,
            RecommendError::NotFound {
                title: "Nope".to_string()
            }
        );
    }

    #[test]
    fn test_rank_puts_nan_last() {
        let engine = engine_for(
            &[("A", None), ("B", None), ("C", None)],
            vec![
                vec![f32::NAN, 0.1, 0.7],
                vec![0.0, 1.0, 0.0],
                vec![0.0, 0.0, 1.0],
            ],
        );

        let ranked = engine.rank(0);
        let indices: Vec<usize> = ranked.iter().map(|c| c.index).collect();
        assert_eq!(indices, vec![2, 1, 0]);
    }

    #[test]
    fn test_rank_out_of_range_is_empty() {
        let engine = engine_for(&[("A", None)], vec![vec![1.0]]);
        assert!(engine.rank(5).is_empty());
    }

    #[test]
    fn test_with_limit() {
        let engine = engine_for(
            &[
                ("Alpha", Some(1)),
                ("Beta", Some(2)),
                ("Gamma", None),
                ("Delta", Some(4)),
                ("Epsilon", Some(5)),
                ("Zeta", Some(6)),
            ],
            identity_with_row0(vec![1.0, 0.9, 0.8, 0.7, 0.6, 0.5]),
        )
        .with_limit(2);

        let recs = engine.recommend("Alpha").unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(engine.limit(), 2);
    }
}
