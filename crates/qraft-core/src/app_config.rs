use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Process-wide configuration, loaded once at startup.
///
/// Provider credentials are optional on purpose: a missing key routes that
/// provider to its local fallback instead of failing startup.
#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub search_api_key: Option<String>,
    pub search_base_url: String,
    pub scrape_api_token: Option<String>,
    pub scrape_base_url: String,
    pub image_api_token: Option<String>,
    pub image_base_url: String,
    pub image_deployment: String,
    pub default_qr_payload: String,
    pub telemetry_url: Option<String>,
    pub telemetry_project: String,
    pub request_timeout_secs: u64,
    pub generation_timeout_secs: u64,
    pub scrape_concurrency: usize,
    pub artifact_dir: PathBuf,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field(
                "search_api_key",
                &self.search_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("search_base_url", &self.search_base_url)
            .field(
                "scrape_api_token",
                &self.scrape_api_token.as_ref().map(|_| "[redacted]"),
            )
            .field("scrape_base_url", &self.scrape_base_url)
            .field(
                "image_api_token",
                &self.image_api_token.as_ref().map(|_| "[redacted]"),
            )
            .field("image_base_url", &self.image_base_url)
            .field("image_deployment", &self.image_deployment)
            .field("default_qr_payload", &self.default_qr_payload)
            .field("telemetry_url", &self.telemetry_url)
            .field("telemetry_project", &self.telemetry_project)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("generation_timeout_secs", &self.generation_timeout_secs)
            .field("scrape_concurrency", &self.scrape_concurrency)
            .field("artifact_dir", &self.artifact_dir)
            .finish()
    }
}
