use thiserror::Error;

/// Errors surfaced by provider clients.
///
/// The search and scrape clients absorb these internally and substitute a
/// local fallback value; only image generation lets them reach the
/// orchestrator, which responds with the degraded path.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("no credential configured for {0}")]
    MissingCredential(&'static str),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider returned status {status}")]
    Status { status: u16 },

    #[error("provider returned no usable output")]
    EmptyOutput,

    #[error("generation job failed: {0}")]
    JobFailed(String),

    #[error("generation did not finish within {0}s")]
    PollDeadline(u64),
}
