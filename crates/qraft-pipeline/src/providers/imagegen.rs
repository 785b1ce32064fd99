//! Image-generation provider client (prompt + QR payload → image URL).
//!
//! The provider exposes a create-then-poll job API: a prediction is created
//! against a named deployment, then polled until it reaches a terminal
//! status. Unlike search and scrape there is no local fallback — errors
//! surface to the orchestrator, which owns the degraded path.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::artifact;
use crate::error::ProviderError;

/// Interval between status polls.
const POLL_INTERVAL_MS: u64 = 1000;

/// Fixed generation parameters for QR-art predictions.
const IMAGE_SIZE: u32 = 768;
const QR_BORDER: u32 = 2;
const NUM_OUTPUTS: u32 = 1;
const GUIDANCE_SCALE: f32 = 7.5;
const INFERENCE_STEPS: u32 = 40;
const CONTROLNET_SCALE: f32 = 1.2;
const QR_BACKGROUND: &str = "white";
const NEGATIVE_PROMPT: &str = "Foreboding mystical, unblended, worst quality, normal quality, \
     low quality, low res, blurry, ugly, disfigured, nsfw, people, animal, character, anime";

#[derive(Debug, Serialize)]
struct PredictionRequest<'a> {
    input: PredictionInput<'a>,
}

#[derive(Debug, Serialize)]
struct PredictionInput<'a> {
    prompt: &'a str,
    qr_code_content: &'a str,
    seed: i64,
    width: u32,
    height: u32,
    border: u32,
    num_outputs: u32,
    guidance_scale: f32,
    num_inference_steps: u32,
    controlnet_conditioning_scale: f32,
    qrcode_background: &'a str,
    negative_prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct Prediction {
    id: String,
    status: String,
    #[serde(default)]
    output: Option<Vec<String>>,
    #[serde(default)]
    error: Option<String>,
}

impl Prediction {
    fn is_terminal(&self) -> bool {
        matches!(self.status.as_str(), "succeeded" | "failed" | "canceled")
    }
}

/// Client for the image-generation provider.
pub struct ImageGenClient {
    client: reqwest::Client,
    token: Option<String>,
    base_url: String,
    deployment: String,
    poll_deadline_secs: u64,
    artifact_dir: PathBuf,
}

impl ImageGenClient {
    /// Create a client pointed at the production image endpoint.
    ///
    /// `poll_deadline_secs` bounds the whole create-then-poll wait and is
    /// distinct from the per-request HTTP timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        token: Option<&str>,
        timeout_secs: u64,
        poll_deadline_secs: u64,
        base_url: &str,
        deployment: &str,
        artifact_dir: &Path,
    ) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("qraft/0.1 (qr-art)")
            .build()?;

        Ok(Self {
            client,
            token: token.map(ToOwned::to_owned),
            base_url: base_url.trim_end_matches('/').to_string(),
            deployment: deployment.to_string(),
            poll_deadline_secs,
            artifact_dir: artifact_dir.to_path_buf(),
        })
    }

    /// Generate one QR-art image and return its URL.
    ///
    /// On success the image bytes are additionally saved under the artifact
    /// directory; a failed save is logged and ignored.
    ///
    /// # Errors
    ///
    /// - [`ProviderError::MissingCredential`] when no API token is configured.
    /// - [`ProviderError::Http`] / [`ProviderError::Status`] on transport or
    ///   HTTP-level failure.
    /// - [`ProviderError::JobFailed`] when the prediction ends failed/canceled.
    /// - [`ProviderError::EmptyOutput`] when a succeeded prediction carries
    ///   no output URL.
    /// - [`ProviderError::PollDeadline`] when the job does not reach a
    ///   terminal status within the poll deadline.
    pub async fn generate(
        &self,
        prompt: &str,
        qr_payload: &str,
    ) -> Result<String, ProviderError> {
        let Some(token) = self.token.as_deref() else {
            return Err(ProviderError::MissingCredential("image generation"));
        };

        let mut prediction = self.create_prediction(prompt, qr_payload, token).await?;
        tracing::debug!(id = %prediction.id, status = %prediction.status, "prediction created");

        let deadline = tokio::time::Instant::now() + Duration::from_secs(self.poll_deadline_secs);
        while !prediction.is_terminal() {
            if tokio::time::Instant::now() >= deadline {
                return Err(ProviderError::PollDeadline(self.poll_deadline_secs));
            }
            tokio::time::sleep(Duration::from_millis(POLL_INTERVAL_MS)).await;
            prediction = self.get_prediction(&prediction.id, token).await?;
        }

        if prediction.status != "succeeded" {
            let reason = prediction
                .error
                .unwrap_or_else(|| format!("prediction ended with status {}", prediction.status));
            return Err(ProviderError::JobFailed(reason));
        }

        let image_url = prediction
            .output
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or(ProviderError::EmptyOutput)?;

        artifact::persist_image(&self.client, &self.artifact_dir, &image_url).await;

        Ok(image_url)
    }

    async fn create_prediction(
        &self,
        prompt: &str,
        qr_payload: &str,
        token: &str,
    ) -> Result<Prediction, ProviderError> {
        let request = PredictionRequest {
            input: PredictionInput {
                prompt,
                qr_code_content: qr_payload,
                seed: -1,
                width: IMAGE_SIZE,
                height: IMAGE_SIZE,
                border: QR_BORDER,
                num_outputs: NUM_OUTPUTS,
                guidance_scale: GUIDANCE_SCALE,
                num_inference_steps: INFERENCE_STEPS,
                controlnet_conditioning_scale: CONTROLNET_SCALE,
                qrcode_background: QR_BACKGROUND,
                negative_prompt: NEGATIVE_PROMPT,
            },
        };

        let response = self
            .client
            .post(format!(
                "{}/v1/deployments/{}/predictions",
                self.base_url, self.deployment
            ))
            .bearer_auth(token)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::Status {
                status: response.status().as_u16(),
            });
        }

        Ok(response.json().await?)
    }

    async fn get_prediction(&self, id: &str, token: &str) -> Result<Prediction, ProviderError> {
        let response = self
            .client
            .get(format!("{}/v1/predictions/{id}", self.base_url))
            .bearer_auth(token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::Status {
                status: response.status().as_u16(),
            });
        }

        Ok(response.json().await?)
    }
}
