//! Placeholder images and resolution outcomes.

use serde::Serialize;

const PLACEHOLDER_BASE: &str = "https://via.placeholder.com/500x750?";

/// Stand-in image shown when no real poster can be served
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Placeholder {
    /// No external id, and the title search found nothing
    NoIdentifier,
    /// Metadata has no poster path
    NoPoster,
    /// Asset host answered, but not with 200
    AssetMissing,
    /// Metadata retries exhausted, or the title search or asset check errored
    Unavailable,
}

impl Placeholder {
    pub fn url(&self) -> String {
        let text = match self {
            Placeholder::NoIdentifier => "No+ID+Found",
            Placeholder::NoPoster => "No+Poster",
            Placeholder::AssetMissing => "Poster+Not+Found",
            Placeholder::Unavailable => "Poster+Unavailable",
        };
        format!("{}text={}", PLACEHOLDER_BASE, text)
    }
}

/// Data the external services confirmed is not there
///
/// Never retried, unlike transport failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Absence {
    NoPoster,
    AssetMissing,
}

impl From<Absence> for Placeholder {
    fn from(absence: Absence) -> Self {
        match absence {
            Absence::NoPoster => Placeholder::NoPoster,
            Absence::AssetMissing => Placeholder::AssetMissing,
        }
    }
}

/// Result of resolving a poster: a verified URL or a placeholder
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PosterOutcome {
    Found(String),
    Placeholder(Placeholder),
}

impl PosterOutcome {
    /// URL to display; never empty
    pub fn url(&self) -> String {
        match self {
            PosterOutcome::Found(url) => url.clone(),
            PosterOutcome::Placeholder(placeholder) => placeholder.url(),
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, PosterOutcome::Found(_))
    }

    /// Whether the outcome is stable enough to memoize.
    ///
    /// `Unavailable` comes from transient network trouble, so a later call
    /// gets another chance.
    pub fn is_cacheable(&self) -> bool {
        !matches!(self, PosterOutcome::Placeholder(Placeholder::Unavailable))
    }
}

impl From<Absence> for PosterOutcome {
    fn from(absence: Absence) -> Self {
        PosterOutcome::Placeholder(absence.into())
    }
}

impl From<Placeholder> for PosterOutcome {
    fn from(placeholder: Placeholder) -> Self {
        PosterOutcome::Placeholder(placeholder)
    }
}
