//! CatalogIndex building and validation.
//!
//! Loads the two dataset files in parallel, checks that the matrix matches the
//! catalog and builds the title lookup table.

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::*;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

impl CatalogIndex {
    /// Load the catalog and similarity matrix from a dataset directory
    ///
    /// Expects `movies.dat` and `similarity.dat` inside `data_dir`.
    pub fn load_from_files(data_dir: &Path) -> Result<Self> {
        info!("Loading catalog from {:?}", data_dir);

        let catalog_path = data_dir.join(parser::CATALOG_FILE);
        let similarity_path = data_dir.join(parser::SIMILARITY_FILE);

        // Parse both files in parallel
        let (entries, rows) = rayon::join(
            || parser::parse_catalog(&catalog_path),
            || parser::parse_similarity_rows(&similarity_path),
        );

        let entries = entries?;
        let similarity = SimilarityMatrix::from_rows(rows?)?;

        info!(
            "Loaded {} catalog entries and a {}x{} similarity matrix",
            entries.len(),
            similarity.size(),
            similarity.size()
        );

        Self::from_parts(entries, similarity)
    }

    /// Build an index from already-parsed parts
    ///
    /// Fails if the matrix does not have exactly one row per entry.
    pub fn from_parts(entries: Vec<CatalogEntry>, similarity: SimilarityMatrix) -> Result<Self> {
        let mut index = Self {
            entries,
            similarity,
            title_index: HashMap::new(),
        };
        index.validate()?;
        index.build_title_index();
        Ok(index)
    }

    /// Map every title to the first position where it appears
    fn build_title_index(&mut self) {
        let mut duplicates = 0usize;
        for (pos, entry) in self.entries.iter().enumerate() {
            if self.title_index.contains_key(&entry.title) {
                duplicates += 1;
                continue;
            }
            self.title_index.insert(entry.title.clone(), pos);
        }

        if duplicates > 0 {
            debug!(duplicates, "Duplicate titles resolve to their first entry");
        }
    }

    /// Validate data integrity
    ///
    /// Check that:
    /// - the matrix has one row per catalog entry
    /// - no title is empty
    pub fn validate(&self) -> Result<()> {
        if self.similarity.size() != self.entries.len() {
            return Err(DataLoadError::SizeMismatch {
                catalog: self.entries.len(),
                matrix: self.similarity.size(),
            });
        }

        if let Some(pos) = self.entries.iter().position(|e| e.title.trim().is_empty()) {
            return Err(DataLoadError::ValidationError(format!(
                "Catalog entry {} has an empty title",
                pos
            )));
        }

        Ok(())
    }
}
