//! Process configuration.
//!
//! Everything is read from environment variables set by the Deployment,
//! falling back to the conventional webhook layout.

use std::path::PathBuf;

use thiserror::Error;
use tracing::warn;

/// Default path to webhook TLS certificate
pub const WEBHOOK_CERT_PATH: &str = "/etc/webhook/certs/tls.crt";
/// Default path to webhook TLS private key
pub const WEBHOOK_KEY_PATH: &str = "/etc/webhook/certs/tls.key";
/// Default webhook server port
pub const WEBHOOK_PORT: u16 = 9443;
/// Default health server port
pub const HEALTH_PORT: u16 = 8080;

/// Errors raised while loading configuration
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A port variable is not a valid u16
    #[error("{var} must be a port number, got {value:?}")]
    InvalidPort { var: &'static str, value: String },

    /// A TLS file does not exist
    #[error("webhook certificate file not found: {0}")]
    MissingCertificate(PathBuf),
}

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// PEM certificate served by the webhook
    pub cert_path: PathBuf,
    /// PEM private key for `cert_path`
    pub key_path: PathBuf,
    /// Port of the HTTPS admission endpoint
    pub webhook_port: u16,
    /// Port of the health and metrics endpoint
    pub health_port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cert_path: PathBuf::from(WEBHOOK_CERT_PATH),
            key_path: PathBuf::from(WEBHOOK_KEY_PATH),
            webhook_port: WEBHOOK_PORT,
            health_port: HEALTH_PORT,
        }
    }
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let path = |var: &str, default: PathBuf| lookup(var).map(PathBuf::from).unwrap_or(default);
        let port = |var: &'static str, default: u16| match lookup(var) {
            Some(value) => match value.trim().parse::<u16>() {
                Ok(port) => Ok(port),
                Err(_) => Err(ConfigError::InvalidPort { var, value }),
            },
            None => Ok(default),
        };

        Ok(Self {
            cert_path: path("WEBHOOK_CERT_PATH", defaults.cert_path),
            key_path: path("WEBHOOK_KEY_PATH", defaults.key_path),
            webhook_port: port("WEBHOOK_PORT", defaults.webhook_port)?,
            health_port: port("HEALTH_PORT", defaults.health_port)?,
        })
    }

    /// Check that the TLS material is present
    pub fn check_certificates(&self) -> Result<(), ConfigError> {
        for path in [&self.cert_path, &self.key_path] {
            if !path.exists() {
                warn!(path = %path.display(), "Webhook certificate file missing");
                return Err(ConfigError::MissingCertificate(path.clone()));
            }
        }
        Ok(())
    }
}
