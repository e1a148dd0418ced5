//! Errors surfaced by the recommendation engine.

use thiserror::Error;

/// Errors returned to callers of `recommend`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecommendError {
    /// The query title matches no catalog entry
    #[error("Movie not found in catalog: {title}")]
    NotFound { title: String },
}

pub type Result<T> = std::result::Result<T, RecommendError>;
