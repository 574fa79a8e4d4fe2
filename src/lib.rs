//! httpproxy-admission library crate
//!
//! Validating admission webhook for Contour `HTTPProxy` resources. A proxy
//! must name its owning controller instance on creation, and that identity
//! can never change afterwards.

pub mod config;
pub mod health;
pub mod webhooks;

pub use config::{Config, ConfigError};
pub use health::HealthState;
pub use webhooks::{Decision, WebhookError, admit, run_webhook_server};
