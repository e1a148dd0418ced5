//! # Posters Crate
//!
//! Turns catalog entries into poster URLs that are always safe to display.
//!
//! ## Main Components
//!
//! - **resolver**: `PosterResolver`, retrying metadata fetch plus asset check
//! - **placeholder**: Placeholder images and the `PosterOutcome` type
//! - **cache**: `MemoCache`, the shared memo behind resolver and orchestrator

pub mod cache;
pub mod placeholder;
pub mod resolver;

pub use cache::MemoCache;
pub use placeholder::{Absence, Placeholder, PosterOutcome};
pub use resolver::{
    DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_BACKOFF, PosterResolver, ResolverSettings,
};
