//! Core domain types: catalog entries, the similarity matrix and the
//! `CatalogIndex` context object that owns both.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Type Aliases
// =============================================================================

/// Position of an entry in the catalog (and row/column of the matrix)
pub type EntryIndex = usize;

/// Identifier used by the external metadata service (a TMDB movie id)
pub type ExternalId = u64;

// =============================================================================
// Catalog
// =============================================================================

/// A single movie known to the recommender.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Title, used as the lookup key
    pub title: String,
    /// External identifier, if the dataset carries one
    pub external_id: Option<ExternalId>,
}

impl CatalogEntry {
    pub fn new(title: impl Into<String>, external_id: Option<ExternalId>) -> Self {
        Self {
            title: title.into(),
            external_id,
        }
    }
}

// =============================================================================
// Similarity Matrix
// =============================================================================

/// Square matrix of precomputed pairwise similarity scores.
///
/// Stored row-major in a single flat buffer. Entry (i, j) is the similarity of
/// catalog entry i to entry j; symmetry is not assumed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityMatrix {
    size: usize,
    scores: Vec<f32>,
}

impl SimilarityMatrix {
    /// Build a matrix from rows, checking that every row has `rows.len()` columns.
    pub fn from_rows(rows: Vec<Vec<f32>>) -> crate::Result<Self> {
        let size = rows.len();
        let mut scores = Vec::with_capacity(size * size);

        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != size {
                return Err(crate::DataLoadError::RaggedMatrix {
                    row,
                    expected: size,
                    found: values.len(),
                });
            }
            scores.extend(values);
        }

        Ok(Self { size, scores })
    }

    /// Number of rows (equal to the number of columns)
    pub fn size(&self) -> usize {
        self.size
    }

    /// Similarity row for entry `index`, or `None` if out of range
    pub fn row(&self, index: EntryIndex) -> Option<&[f32]> {
        if index >= self.size {
            return None;
        }
        let start = index * self.size;
        Some(&self.scores[start..start + self.size])
    }

    /// Single score lookup
    pub fn score(&self, from: EntryIndex, to: EntryIndex) -> Option<f32> {
        self.row(from)?.get(to).copied()
    }
}

// =============================================================================
// CatalogIndex - the read-only context shared by engine and orchestrator
// =============================================================================

/// Catalog entries plus their similarity matrix.
///
/// Built once at process start and shared behind an `Arc`; nothing mutates it
/// afterwards. Lookups by title are exact and resolve to the first entry with
/// that title.
#[derive(Debug)]
pub struct CatalogIndex {
    pub(crate) entries: Vec<CatalogEntry>,
    pub(crate) similarity: SimilarityMatrix,
    /// Title -> first position carrying that title
    pub(crate) title_index: HashMap<String, EntryIndex>,
}

impl CatalogIndex {
    /// Get an entry by catalog position
    pub fn get(&self, index: EntryIndex) -> Option<&CatalogEntry> {
        self.entries.get(index)
    }

    /// Position of the first entry whose title equals `title` exactly
    pub fn position_of(&self, title: &str) -> Option<EntryIndex> {
        self.title_index.get(title).copied()
    }

    /// Similarity row for the entry at `index`
    pub fn similarity_row(&self, index: EntryIndex) -> Option<&[f32]> {
        self.similarity.row(index)
    }

    /// All entries in catalog order
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// The underlying similarity matrix
    pub fn similarity(&self) -> &SimilarityMatrix {
        &self.similarity
    }

    /// Number of catalog entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get counts for debugging/validation: (entries, entries with an id)
    pub fn counts(&self) -> (usize, usize) {
        let with_id = self
            .entries
            .iter()
            .filter(|e| e.external_id.is_some())
            .count();
        (self.entries.len(), with_id)
    }
}
