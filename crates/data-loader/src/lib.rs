//! # Data Loader Crate
//!
//! Loads the movie catalog and its precomputed similarity matrix.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (CatalogEntry, SimilarityMatrix, CatalogIndex)
//! - **parser**: Parse the .dat files into Rust structs
//! - **index**: Validate the data and build the title lookup
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::CatalogIndex;
//! use std::path::Path;
//!
//! let index = CatalogIndex::load_from_files(Path::new("data"))?;
//!
//! let pos = index.position_of("Avatar").unwrap();
//! let row = index.similarity_row(pos).unwrap();
//! println!("{} has {} similarity scores", index.get(pos).unwrap().title, row.len());
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod index;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use types::{
    // Type aliases
    EntryIndex,
    ExternalId,
    // Core types
    CatalogEntry,
    CatalogIndex,
    SimilarityMatrix,
};
