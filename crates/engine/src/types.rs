//! Types produced by the ranking step.

use data_loader::{EntryIndex, ExternalId};
use serde::{Deserialize, Serialize};

/// A catalog position paired with its similarity to the query
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub index: EntryIndex,
    pub score: f32,
}

impl Candidate {
    pub fn new(index: EntryIndex, score: f32) -> Self {
        Self { index, score }
    }
}

/// A recommended movie, resolved back to its catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedMovie {
    /// Position in the catalog
    pub index: EntryIndex,
    pub title: String,
    pub external_id: Option<ExternalId>,
    /// Similarity to the queried movie
    pub score: f32,
}
