//! Webhook module for validating HTTPProxy admission requests.
//!
//! Layers, leaf-first:
//! - `policies`: identity extraction and the CREATE/UPDATE rules
//! - `review`: resolves identities for a request and runs the rules
//! - `responder`: turns a decision into an admission response
//! - `server`: HTTPS transport

pub mod policies;
pub mod responder;
pub mod review;
mod server;

pub use policies::{Decision, IdentityTuple, ReviewError, ValidationContext};
pub use responder::respond;
pub use review::review;
pub use server::{
    VALIDATE_HTTPPROXY_PATH, WebhookError, WebhookState, admit, create_webhook_router,
    run_webhook_server,
};

// Re-export kube-rs admission types for contract testing
pub use kube::core::DynamicObject;
pub use kube::core::admission::{AdmissionRequest, AdmissionResponse, AdmissionReview, Operation};
