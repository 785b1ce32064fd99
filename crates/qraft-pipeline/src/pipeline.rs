//! Pipeline orchestration: search → scrape → analyze → summarize →
//! craft-prompt → generate, with a result-quality gate and a degraded path.

use std::sync::Arc;

use futures::stream::{self, StreamExt};

use qraft_core::AppConfig;

use crate::error::ProviderError;
use crate::gate::{classify_artifact, Verdict};
use crate::prompt::{craft_prompt, degraded_prompt, summarize_brand};
use crate::providers::{ImageGenClient, ScrapeClient, SearchClient};
use crate::telemetry::TelemetrySink;
use crate::types::{BrandQuery, GenerationResult, PipelineReport, ScrapedPage, StyleProfile};

/// The pipeline orchestrator. Stateless across invocations; each call to
/// [`Pipeline::run`] is an independent run sharing only the provider
/// clients and the telemetry handle.
pub struct Pipeline {
    search: SearchClient,
    scraper: ScrapeClient,
    imagegen: ImageGenClient,
    telemetry: Arc<dyn TelemetrySink>,
    scrape_concurrency: usize,
}

impl Pipeline {
    /// Production constructor — builds all provider clients from config.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if an underlying HTTP client cannot
    /// be constructed.
    pub fn from_config(
        config: &AppConfig,
        telemetry: Arc<dyn TelemetrySink>,
    ) -> Result<Self, ProviderError> {
        let search = SearchClient::new(
            config.search_api_key.as_deref(),
            config.request_timeout_secs,
            &config.search_base_url,
        )?;
        let scraper = ScrapeClient::new(
            config.scrape_api_token.as_deref(),
            config.request_timeout_secs,
            &config.scrape_base_url,
        )?;
        let imagegen = ImageGenClient::new(
            config.image_api_token.as_deref(),
            config.request_timeout_secs,
            config.generation_timeout_secs,
            &config.image_base_url,
            &config.image_deployment,
            &config.artifact_dir,
        )?;

        Ok(Self::new(
            search,
            scraper,
            imagegen,
            telemetry,
            config.scrape_concurrency,
        ))
    }

    /// Constructor with injected clients, used by tests to point providers
    /// at mock servers.
    #[must_use]
    pub fn new(
        search: SearchClient,
        scraper: ScrapeClient,
        imagegen: ImageGenClient,
        telemetry: Arc<dyn TelemetrySink>,
        scrape_concurrency: usize,
    ) -> Self {
        Self {
            search,
            scraper,
            imagegen,
            telemetry,
            scrape_concurrency,
        }
    }

    /// Run the full pipeline for one brand query.
    ///
    /// Always terminates with a report: either a gated image URL (from the
    /// primary or degraded path) or an explicit failure reason when both
    /// generation attempts fail. Search and scrape cannot fail the run —
    /// their adapters substitute fallback values locally.
    pub async fn run(&self, query: BrandQuery) -> PipelineReport {
        tracing::info!(brand = %query.brand_name, "starting pipeline run");

        // Stage 1: search.
        let search_result = self.search.search(&query.brand_name).await;
        self.emit(
            "search_completed",
            serde_json::json!({
                "brand": query.brand_name,
                "urls": search_result.urls.len(),
            }),
        );

        // Stage 2: scrape — bounded fan-out, results in input URL order.
        let pages: Vec<ScrapedPage> = stream::iter(search_result.urls.clone().into_iter())
            .map(|url| async move { self.scraper.scrape(&url).await })
            .buffered(self.scrape_concurrency.max(1))
            .collect()
            .await;
        self.emit(
            "scrape_completed",
            serde_json::json!({
                "brand": query.brand_name,
                "pages": pages.len(),
            }),
        );

        // Stage 3: analyze.
        let style = StyleProfile::from_pages(&pages);
        self.emit(
            "analyze_completed",
            serde_json::json!({
                "brand": query.brand_name,
                "keywords": style.keywords,
                "colors": style.colors,
            }),
        );

        // Stage 4 + 5: summarize and craft the prompt.
        let summary = summarize_brand(&query.brand_name, &style);
        let prompt = craft_prompt(&query.brand_name, &style);
        self.emit(
            "prompt_crafted",
            serde_json::json!({
                "brand": query.brand_name,
                "prompt_chars": prompt.text.chars().count(),
            }),
        );

        // Stage 6: generate, then gate the returned value.
        let primary = self.imagegen.generate(&prompt.text, &query.qr_payload).await;
        let (result, degraded) = match primary {
            Ok(value) => match classify_artifact(&value) {
                Verdict::Accepted => (GenerationResult::Success { image_url: value }, false),
                verdict => {
                    tracing::warn!(
                        brand = %query.brand_name,
                        ?verdict,
                        value = %value,
                        "generation returned a non-answer; taking degraded path"
                    );
                    (self.run_degraded(&query).await, true)
                }
            },
            Err(e) => {
                tracing::warn!(
                    brand = %query.brand_name,
                    error = %e,
                    "primary generation failed; taking degraded path"
                );
                (self.run_degraded(&query).await, true)
            }
        };

        self.emit(
            "pipeline_completed",
            serde_json::json!({
                "brand": query.brand_name,
                "degraded": degraded,
                "success": matches!(result, GenerationResult::Success { .. }),
            }),
        );
        tracing::info!(
            brand = %query.brand_name,
            degraded,
            success = matches!(result, GenerationResult::Success { .. }),
            "pipeline run finished"
        );

        PipelineReport {
            brand_name: query.brand_name,
            qr_payload: query.qr_payload,
            urls: search_result.urls,
            style,
            summary,
            prompt,
            degraded,
            result,
        }
    }

    /// One direct re-invocation of image generation with the fixed
    /// brand-name-only prompt. Its outcome is final: no re-gating, no
    /// further retry.
    async fn run_degraded(&self, query: &BrandQuery) -> GenerationResult {
        let prompt = degraded_prompt(&query.brand_name);
        match self.imagegen.generate(&prompt.text, &query.qr_payload).await {
            Ok(image_url) => GenerationResult::Success { image_url },
            Err(e) => {
                tracing::warn!(brand = %query.brand_name, error = %e, "degraded generation failed");
                GenerationResult::Failure {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Telemetry emission with its own error boundary: the sink contract is
    /// non-blocking and non-failing, so this is a plain forward.
    fn emit(&self, event: &str, payload: serde_json::Value) {
        self.telemetry.emit(event, payload);
    }
}
