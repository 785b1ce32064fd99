//! Best-effort telemetry forwarding.
//!
//! Events are fire-and-forget: emission never blocks a pipeline run and
//! every transport failure is contained and logged. The sink handle is
//! injected into the orchestrator at construction; the default is a no-op.

use std::sync::Arc;
use std::time::Duration;

use qraft_core::AppConfig;

/// Sink for structured pipeline events. Safe for concurrent use.
pub trait TelemetrySink: Send + Sync {
    /// Record one named event. Must never block and never fail the caller.
    fn emit(&self, event: &str, payload: serde_json::Value);
}

/// Sink that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTelemetry;

impl TelemetrySink for NoopTelemetry {
    fn emit(&self, _event: &str, _payload: serde_json::Value) {}
}

/// Sink that POSTs events as JSON to an external collector.
///
/// Each emit spawns a detached task; the response is checked only to log
/// non-success statuses at debug level.
pub struct HttpTelemetry {
    client: reqwest::Client,
    url: String,
    project: String,
}

impl HttpTelemetry {
    /// Create a new `HttpTelemetry` posting to `url` under `project`.
    ///
    /// # Errors
    ///
    /// Returns the underlying `reqwest` error if the HTTP client cannot be
    /// constructed.
    pub fn new(url: &str, project: &str) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .connect_timeout(Duration::from_secs(5))
            .user_agent("qraft/0.1 (telemetry)")
            .build()?;
        Ok(Self {
            client,
            url: url.to_string(),
            project: project.to_string(),
        })
    }
}

impl TelemetrySink for HttpTelemetry {
    fn emit(&self, event: &str, payload: serde_json::Value) {
        let body = serde_json::json!({
            "project": self.project,
            "event": event,
            "payload": payload,
            "recorded_at": chrono::Utc::now(),
        });
        let client = self.client.clone();
        let url = self.url.clone();
        let event = event.to_string();

        // Detached: the pipeline response never waits on the collector.
        tokio::spawn(async move {
            match client.post(&url).json(&body).send().await {
                Ok(response) if !response.status().is_success() => {
                    tracing::debug!(
                        event = %event,
                        status = %response.status(),
                        "telemetry collector rejected event"
                    );
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!(event = %event, error = %e, "telemetry send failed");
                }
            }
        });
    }
}

/// Build the telemetry sink for this process from config.
///
/// A missing collector URL (or a client construction failure) yields the
/// no-op sink — telemetry availability never affects startup.
#[must_use]
pub fn sink_from_config(config: &AppConfig) -> Arc<dyn TelemetrySink> {
    match &config.telemetry_url {
        Some(url) => match HttpTelemetry::new(url, &config.telemetry_project) {
            Ok(sink) => Arc::new(sink),
            Err(e) => {
                tracing::warn!(error = %e, "telemetry client construction failed; using no-op sink");
                Arc::new(NoopTelemetry)
            }
        },
        None => Arc::new(NoopTelemetry),
    }
}
