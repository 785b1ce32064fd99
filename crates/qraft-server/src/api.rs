use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use qraft_pipeline::telemetry::TelemetrySink;
use qraft_pipeline::{BrandQuery, Pipeline, PipelineReport};

use crate::middleware::{request_id, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub telemetry: Arc<dyn TelemetrySink>,
    pub default_qr_payload: String,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

impl ResponseMeta {
    fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RunPipelineRequest {
    topic: String,
    qr_payload: Option<String>,
}

#[derive(Debug, Serialize)]
struct RunPipelineResponse {
    result: PipelineReport,
    meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
struct HealthData {
    status: &'static str,
}

#[derive(Debug, Serialize)]
struct TraceData {
    status: &'static str,
    meta: ResponseMeta,
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/run-pipeline", post(run_pipeline))
        .route("/trace", post(trace_event))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(HealthData { status: "ok" })
}

/// Run one pipeline invocation and return its report.
///
/// Always 200 for provider-side outcomes: a failed generation rides inside
/// the report as `Failure { reason }`, never as a transport error.
async fn run_pipeline(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(req): Json<RunPipelineRequest>,
) -> impl IntoResponse {
    let qr_payload = req
        .qr_payload
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| state.default_qr_payload.clone());

    let query = BrandQuery {
        brand_name: req.topic,
        qr_payload,
    };

    let report = state.pipeline.run(query).await;

    Json(RunPipelineResponse {
        result: report,
        meta: ResponseMeta::new(req_id.0),
    })
}

/// Forward an arbitrary JSON event to the telemetry sink.
async fn trace_event(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(event): Json<serde_json::Value>,
) -> impl IntoResponse {
    state.telemetry.emit("trace_event", event);
    Json(TraceData {
        status: "logged",
        meta: ResponseMeta::new(req_id.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use qraft_pipeline::providers::{ImageGenClient, ScrapeClient, SearchClient};
    use qraft_pipeline::telemetry::NoopTelemetry;
    use tower::ServiceExt;

    /// State with every provider disabled: all adapters fall back locally
    /// and image generation fails fast, so no test touches the network.
    fn offline_state() -> AppState {
        let closed = "http://127.0.0.1:9";
        let artifact_dir = std::env::temp_dir().join("qraft-server-tests");
        let search = SearchClient::new(None, 5, closed).expect("search client");
        let scraper = ScrapeClient::new(None, 5, closed).expect("scrape client");
        let imagegen = ImageGenClient::new(None, 5, 2, closed, "qraft/qr-art", &artifact_dir)
            .expect("imagegen client");
        let telemetry: Arc<dyn TelemetrySink> = Arc::new(NoopTelemetry);
        let pipeline = Arc::new(Pipeline::new(
            search,
            scraper,
            imagegen,
            Arc::clone(&telemetry),
            3,
        ));
        AppState {
            pipeline,
            telemetry,
            default_qr_payload: "qraft.dev/demo".to_string(),
        }
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let app = build_app(offline_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json parse");
        assert_eq!(json["status"].as_str(), Some("ok"));
    }

    #[tokio::test]
    async fn run_pipeline_returns_200_with_failure_payload_when_providers_disabled() {
        let app = build_app(offline_state());
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/run-pipeline")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"topic":"Acme"}"#))
                    .expect("request"),
            )
            .await
            .expect("response");

        // Provider failure is carried in the body, never in the status.
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json parse");

        assert_eq!(json["result"]["brand_name"].as_str(), Some("Acme"));
        assert_eq!(json["result"]["qr_payload"].as_str(), Some("qraft.dev/demo"));
        assert_eq!(json["result"]["result"]["status"].as_str(), Some("failure"));
        assert_eq!(json["result"]["degraded"].as_bool(), Some(true));
        assert_eq!(json["result"]["urls"].as_array().map(Vec::len), Some(3));
        assert!(json["meta"]["request_id"].is_string());
    }

    #[tokio::test]
    async fn run_pipeline_uses_supplied_qr_payload() {
        let app = build_app(offline_state());
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/run-pipeline")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"topic":"Acme","qr_payload":"acme.example.com/qr"}"#,
                    ))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json parse");
        assert_eq!(
            json["result"]["qr_payload"].as_str(),
            Some("acme.example.com/qr")
        );
    }

    #[tokio::test]
    async fn trace_forwards_event_and_returns_logged() {
        let app = build_app(offline_state());
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/trace")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"step":"frontend-clicked"}"#))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json parse");
        assert_eq!(json["status"].as_str(), Some("logged"));
    }

    #[tokio::test]
    async fn request_id_header_is_echoed_back() {
        let app = build_app(offline_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header("x-request-id", "req-abc-123")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(
            response
                .headers()
                .get("x-request-id")
                .and_then(|v| v.to_str().ok()),
            Some("req-abc-123")
        );
    }
}
