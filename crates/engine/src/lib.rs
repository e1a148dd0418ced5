//! # Engine Crate
//!
//! Recommendation engine over a precomputed similarity matrix.
//!
//! Given a title, the engine looks up its similarity row in the
//! [`CatalogIndex`](data_loader::CatalogIndex), ranks every other entry by
//! score and returns the top matches. It does no I/O: poster lookups happen
//! downstream in the `posters` crate.
//!
//! ## Example Usage
//!
//! ```ignore
//! use engine::SimilarityEngine;
//! use data_loader::CatalogIndex;
//! use std::sync::Arc;
//!
//! let index = Arc::new(CatalogIndex::load_from_files("data".as_ref())?);
//! let engine = SimilarityEngine::new(index);
//!
//! for movie in engine.recommend("Avatar")? {
//!     println!("{} ({:.3})", movie.title, movie.score);
//! }
//! ```

pub mod error;
pub mod similarity;
pub mod types;

pub use error::{RecommendError, Result};
pub use similarity::{SimilarityEngine, DEFAULT_LIMIT};
pub use types::{Candidate, RankedMovie};
