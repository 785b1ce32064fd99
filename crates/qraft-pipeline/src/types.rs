use serde::Serialize;

/// Input for one pipeline run. Created at request start; never mutated.
#[derive(Debug, Clone)]
pub struct BrandQuery {
    /// Brand to research.
    pub brand_name: String,
    /// Data encoded into the generated QR code.
    pub qr_payload: String,
}

/// URLs produced by the search stage. Never empty: synthetic search-engine
/// URLs are substituted when the provider yields nothing.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub urls: Vec<String>,
}

/// One scraped page. `text` is never empty and never exceeds the scrape cap;
/// a synthetic placeholder is substituted when scraping fails or returns
/// blank content.
#[derive(Debug, Clone, Serialize)]
pub struct ScrapedPage {
    pub url: String,
    pub text: String,
}

/// Style attributes derived from scraped pages.
///
/// `keywords` holds up to 6 descriptor tags; `colors` holds up to 8 hex
/// strings in first-seen order, deduplicated case-insensitively. Both fall
/// back to a fixed baseline when extraction yields nothing.
#[derive(Debug, Clone, Serialize)]
pub struct StyleProfile {
    pub keywords: Vec<String>,
    pub colors: Vec<String>,
}

/// Free-text synthesis of the brand's visual identity.
#[derive(Debug, Clone, Serialize)]
pub struct BrandSummary {
    pub narrative: String,
}

/// Prompt handed to the image-generation provider. Comma-separated keyword
/// phrases, capped at 120 characters.
#[derive(Debug, Clone, Serialize)]
pub struct ArtPrompt {
    pub text: String,
}

/// Terminal artifact of a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GenerationResult {
    Success { image_url: String },
    Failure { reason: String },
}

/// Structured report returned to the caller. Always produced — provider
/// failures ride inside `result`, never as a transport error.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub brand_name: String,
    pub qr_payload: String,
    pub urls: Vec<String>,
    pub style: StyleProfile,
    pub summary: BrandSummary,
    pub prompt: ArtPrompt,
    /// True when the degraded path produced (or last attempted) the result.
    pub degraded: bool,
    pub result: GenerationResult,
}
