//! Server crate for the movie recommender.
//!
//! This crate contains the configuration layer and the orchestrator that
//! combines similarity ranking with poster resolution.

pub mod config;
pub mod orchestrator;

pub use config::Config;
pub use orchestrator::{DEFAULT_INTER_CALL_DELAY, MovieRecommendation, RecommendationOrchestrator};
