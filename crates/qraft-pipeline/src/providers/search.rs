//! Search provider client (brand name → candidate URLs).

use std::time::Duration;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::types::SearchResult;

/// Number of results requested from the provider, and the number of
/// synthetic fallback URLs.
const SEARCH_RESULT_COUNT: usize = 3;

/// Query suffixes for the synthetic search-engine fallback URLs.
const FALLBACK_QUERY_SUFFIXES: [&str; 3] = ["visual+identity", "brand+design", "logo+design"];

#[derive(Debug, Serialize)]
struct SearchRequest {
    query: String,
    #[serde(rename = "numResults")]
    num_results: usize,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    url: String,
}

/// Client for the semantic search provider.
///
/// [`SearchClient::search`] is total: any provider problem (missing key,
/// non-success status, transport error, timeout, zero results) silently
/// degrades to deterministic synthetic search-engine URLs.
pub struct SearchClient {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl SearchClient {
    /// Create a client pointed at the production search endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_key: Option<&str>,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("qraft/0.1 (brand-research)")
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.map(ToOwned::to_owned),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Find candidate URLs for a brand's visual identity. Never fails.
    pub async fn search(&self, brand_name: &str) -> SearchResult {
        let Some(api_key) = self.api_key.as_deref() else {
            tracing::warn!(brand = brand_name, "search key not configured; using fallback URLs");
            return Self::fallback(brand_name);
        };

        match self.try_search(brand_name, api_key).await {
            Ok(urls) if !urls.is_empty() => SearchResult { urls },
            Ok(_) => {
                tracing::warn!(brand = brand_name, "search returned no results; using fallback URLs");
                Self::fallback(brand_name)
            }
            Err(e) => {
                tracing::warn!(brand = brand_name, error = %e, "search failed; using fallback URLs");
                Self::fallback(brand_name)
            }
        }
    }

    async fn try_search(
        &self,
        brand_name: &str,
        api_key: &str,
    ) -> Result<Vec<String>, ProviderError> {
        let request = SearchRequest {
            query: format!("{brand_name} visual identity"),
            num_results: SEARCH_RESULT_COUNT,
        };

        let response = self
            .client
            .post(format!("{}/search", self.base_url))
            .header("x-api-key", api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::Status {
                status: response.status().as_u16(),
            });
        }

        let parsed: SearchResponse = response.json().await?;
        Ok(parsed.results.into_iter().map(|hit| hit.url).collect())
    }

    /// Deterministic search-engine URLs built from the brand name.
    fn fallback(brand_name: &str) -> SearchResult {
        let tokens: Vec<String> = brand_name
            .split_whitespace()
            .map(|t| utf8_percent_encode(t, NON_ALPHANUMERIC).to_string())
            .collect();
        let brand = tokens.join("+");

        let urls = FALLBACK_QUERY_SUFFIXES
            .iter()
            .map(|suffix| format!("https://www.google.com/search?q={brand}+{suffix}"))
            .collect();

        SearchResult { urls }
    }
}
