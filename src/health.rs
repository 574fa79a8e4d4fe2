//! Plain-HTTP side port of the admission webhook.
//!
//! The kubelet probes `/healthz` and `/readyz` here, so they stay reachable
//! without the webhook's serving certificate. `/readyz` answers 200 only
//! between the TLS listener binding and the start of shutdown. `/metrics`
//! exposes review counts and latency by operation.

use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use prometheus_client::encoding::text::encode;
use prometheus_client::encoding::{EncodeLabel, EncodeLabelSet, LabelSetEncoder};
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::histogram::{Histogram, exponential_buckets};
use prometheus_client::registry::Registry;
use tokio::sync::RwLock;
use tracing::info;

/// Labels of `httpproxy_admission_requests_total`
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct ReviewLabels {
    pub operation: String,
    pub outcome: String,
}

impl EncodeLabelSet for ReviewLabels {
    fn encode(&self, encoder: &mut LabelSetEncoder<'_>) -> Result<(), std::fmt::Error> {
        ("operation", self.operation.as_str()).encode(encoder.encode_label())?;
        ("outcome", self.outcome.as_str()).encode(encoder.encode_label())?;
        Ok(())
    }
}

/// Labels of `httpproxy_admission_duration_seconds`
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct OperationLabels {
    pub operation: String,
}

impl EncodeLabelSet for OperationLabels {
    fn encode(&self, encoder: &mut LabelSetEncoder<'_>) -> Result<(), std::fmt::Error> {
        ("operation", self.operation.as_str()).encode(encoder.encode_label())?;
        Ok(())
    }
}

/// Review metrics, registered in a registry of their own
pub struct Metrics {
    /// Reviews answered, by operation and outcome
    pub requests_total: Family<ReviewLabels, Counter>,
    /// Time spent deciding a review
    pub duration_seconds: Family<OperationLabels, Histogram>,
    /// Reviews rejected before evaluation (no request in the envelope)
    pub invalid_reviews_total: Counter,
    /// Prometheus registry
    registry: Registry,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    /// Register the review metric families
    pub fn new() -> Self {
        let mut registry = Registry::default();

        let requests_total = Family::<ReviewLabels, Counter>::default();
        registry.register(
            "httpproxy_admission_requests",
            "Total number of admission reviews answered",
            requests_total.clone(),
        );

        let duration_seconds = Family::<OperationLabels, Histogram>::new_with_constructor(|| {
            Histogram::new(exponential_buckets(0.00001, 2.0, 15))
        });
        registry.register(
            "httpproxy_admission_duration_seconds",
            "Duration of admission review evaluation in seconds",
            duration_seconds.clone(),
        );

        let invalid_reviews_total = Counter::default();
        registry.register(
            "httpproxy_admission_invalid_reviews",
            "Total number of admission reviews without a request",
            invalid_reviews_total.clone(),
        );

        Self {
            requests_total,
            duration_seconds,
            invalid_reviews_total,
            registry,
        }
    }

    /// Count one answered review and observe how long deciding it took
    pub fn record_review(&self, operation: &str, outcome: &str, duration_secs: f64) {
        let labels = ReviewLabels {
            operation: operation.to_string(),
            outcome: outcome.to_string(),
        };
        self.requests_total.get_or_create(&labels).inc();
        self.duration_seconds
            .get_or_create(&OperationLabels {
                operation: operation.to_string(),
            })
            .observe(duration_secs);
    }

    /// Record a review that carried no request
    pub fn record_invalid_review(&self) {
        self.invalid_reviews_total.inc();
    }

    /// Render the registry in the Prometheus text exposition format
    pub fn encode(&self) -> String {
        let mut buffer = String::new();
        if encode(&mut buffer, &self.registry).is_err() {
            tracing::error!("Failed to encode metrics");
            return "# Error encoding metrics".to_string();
        }
        buffer
    }
}

/// State shared by the webhook handlers, the side port and shutdown
pub struct HealthState {
    /// Set while the TLS listener is bound and shutdown has not begun
    ready: RwLock<bool>,
    /// Review metrics
    pub metrics: Metrics,
}

impl Default for HealthState {
    fn default() -> Self {
        Self::new()
    }
}

impl HealthState {
    /// Fresh state, not ready until the webhook binds
    pub fn new() -> Self {
        Self {
            ready: RwLock::new(false),
            metrics: Metrics::new(),
        }
    }

    /// Flip the readiness reported on `/readyz`
    pub async fn set_ready(&self, ready: bool) {
        *self.ready.write().await = ready;
    }

    /// Readiness as last set
    pub async fn is_ready(&self) -> bool {
        *self.ready.read().await
    }
}

/// Liveness: the process answers, nothing else is checked
async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

/// Readiness: 503 until the webhook listener is bound and again once
/// shutdown starts, so the Service only routes reviews to a serving pod.
async fn readyz(State(state): State<Arc<HealthState>>) -> Response {
    if state.is_ready().await {
        (StatusCode::OK, "ready").into_response()
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not ready").into_response()
    }
}

/// Prometheus scrape endpoint
async fn metrics_handler(State(state): State<Arc<HealthState>>) -> impl IntoResponse {
    let body = state.metrics.encode();
    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
}

/// Router for the side port
pub fn create_router(state: Arc<HealthState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

/// Serve the side port on 0.0.0.0:`port` until the listener fails.
pub async fn run_health_server(state: Arc<HealthState>, port: u16) -> Result<(), std::io::Error> {
    let app = create_router(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    info!(port, "Serving probes and metrics");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
