//! Admission webhook server.
//!
//! Provides the HTTPS endpoint the API server calls for HTTPProxy
//! CREATE and UPDATE requests.
//!
//! To enable the webhook:
//! 1. Deploy cert-manager for TLS certificates
//! 2. Create a ValidatingWebhookConfiguration pointing at
//!    `/validate-projectcontour-io-httpproxy`
//! 3. Mount the TLS certificate secret to the pod at /etc/webhook/certs/

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use axum_server::Handle;
use axum_server::tls_rustls::RustlsConfig;
use kube::core::DynamicObject;
use kube::core::admission::{AdmissionRequest, AdmissionResponse, AdmissionReview};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::health::HealthState;
use crate::webhooks::policies::Decision;
use crate::webhooks::responder::respond;
use crate::webhooks::review::review;

/// Path the ValidatingWebhookConfiguration points at
pub const VALIDATE_HTTPPROXY_PATH: &str = "/validate-projectcontour-io-httpproxy";

/// Shared state for webhook handlers
pub struct WebhookState {
    /// Readiness flag and review metrics shared with the health server
    pub health: Arc<HealthState>,
}

impl WebhookState {
    /// Create handler state around the shared health state
    pub fn new(health: Arc<HealthState>) -> Self {
        Self { health }
    }
}

/// Create the webhook router
pub fn create_webhook_router(state: Arc<WebhookState>) -> Router {
    Router::new()
        .route(VALIDATE_HTTPPROXY_PATH, post(validate_httpproxy))
        .with_state(state)
}

/// HTTPProxy admission webhook handler
async fn validate_httpproxy(
    State(state): State<Arc<WebhookState>>,
    Json(review): Json<AdmissionReview<DynamicObject>>,
) -> (StatusCode, Json<AdmissionReview<DynamicObject>>) {
    let (status, review) = admit(review, Some(&state.health));
    (status, Json(review))
}

/// Answer an admission review.
///
/// Reviews without a request are rejected with 400. Every well-formed
/// review is answered with 200 and the verdict in the response body.
pub fn admit(
    admission_review: AdmissionReview<DynamicObject>,
    health: Option<&HealthState>,
) -> (StatusCode, AdmissionReview<DynamicObject>) {
    let started = Instant::now();

    let request: AdmissionRequest<DynamicObject> = match admission_review.try_into() {
        Ok(req) => req,
        Err(e) => {
            error!(error = %e, "Failed to extract admission request");
            if let Some(health) = health {
                health.metrics.record_invalid_review();
            }
            return (
                StatusCode::BAD_REQUEST,
                AdmissionResponse::invalid(format!("Invalid AdmissionReview: {}", e)).into_review(),
            );
        }
    };

    let uid = &request.uid;
    let operation = format!("{:?}", request.operation).to_uppercase();
    debug!(
        uid = %uid,
        operation = %operation,
        namespace = ?request.namespace,
        name = %request.name,
        "Processing admission request"
    );

    let decision = review(&request);
    match &decision {
        Decision::Allowed => {
            info!(uid = %uid, operation = %operation, "Admission request allowed");
        }
        Decision::Denied { reason } => {
            warn!(uid = %uid, operation = %operation, reason = %reason, "Admission request denied");
        }
        Decision::Errored(cause) => {
            error!(
                uid = %uid,
                operation = %operation,
                error = %cause,
                "Admission request could not be evaluated"
            );
        }
    }

    if let Some(health) = health {
        health.metrics.record_review(
            &operation,
            decision.outcome(),
            started.elapsed().as_secs_f64(),
        );
    }

    (StatusCode::OK, respond(&request, &decision).into_review())
}

/// Errors that can occur when running the webhook server
#[derive(Error, Debug)]
pub enum WebhookError {
    /// TLS configuration error
    #[error("TLS configuration error: {0}")]
    TlsConfig(String),

    /// Server error
    #[error("Webhook server error: {0}")]
    Server(String),
}

/// Run the webhook server with TLS
///
/// Binds to 0.0.0.0 on the configured port. TLS material is loaded from the
/// configured PEM files; the process is marked ready once the listener is bound.
pub async fn run_webhook_server(
    config: &Config,
    health: Arc<HealthState>,
) -> Result<(), WebhookError> {
    let tls = RustlsConfig::from_pem_file(&config.cert_path, &config.key_path)
        .await
        .map_err(|e| WebhookError::TlsConfig(e.to_string()))?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.webhook_port));
    serve_tls(addr, tls, health).await
}

/// Serve the webhook router on `addr`.
///
/// Readiness follows the listener: set once the socket is bound, cleared
/// again if serving fails.
async fn serve_tls(
    addr: SocketAddr,
    tls: RustlsConfig,
    health: Arc<HealthState>,
) -> Result<(), WebhookError> {
    let app = create_webhook_router(Arc::new(WebhookState::new(health.clone())));

    let handle = Handle::new();
    let listening = handle.clone();
    let ready = health.clone();
    tokio::spawn(async move {
        if let Some(bound) = listening.listening().await {
            info!(
                address = %bound,
                path = VALIDATE_HTTPPROXY_PATH,
                "Webhook server listening with TLS"
            );
            ready.set_ready(true).await;
        }
    });

    let served = axum_server::bind_rustls(addr, tls)
        .handle(handle)
        .serve(app.into_make_service())
        .await;

    if let Err(e) = served {
        health.set_ready(false).await;
        return Err(WebhookError::Server(e.to_string()));
    }

    Ok(())
}
