//! Brand-research-to-QR-art pipeline for qraft.
//!
//! Chains search, scrape, text analysis, summary/prompt synthesis, and
//! image generation into one sequential run. Search and scrape degrade to
//! local fallbacks when their providers are unusable; generation output is
//! checked by a result-quality gate, with a degraded brand-name-only
//! re-invocation when the primary attempt fails or returns a placeholder.

pub mod analyzer;
pub mod error;
pub mod gate;
pub mod pipeline;
pub mod prompt;
pub mod providers;
pub mod telemetry;
pub mod types;

mod artifact;

pub use error::ProviderError;
pub use pipeline::Pipeline;
pub use types::{
    ArtPrompt, BrandQuery, BrandSummary, GenerationResult, PipelineReport, ScrapedPage,
    SearchResult, StyleProfile,
};
