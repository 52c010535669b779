use axum::http::HeaderValue;
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_ALLOWED_ORIGIN: &str = "https://list.officeally.com";

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Port cannot be 0")]
    InvalidPort,

    #[error("Invalid CORS origin: {0}")]
    InvalidOrigin(String),
}

/// Webhook server configuration
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub listener: Listener,
    #[serde(default)]
    pub cors: CorsConfig,
}

impl Config {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.listener.validate()?;
        self.cors.allowed_origin()?;
        Ok(())
    }
}

/// Network listener configuration
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Listener {
    /// Host address to bind to (e.g., "0.0.0.0" or "127.0.0.1")
    pub host: String,
    /// Port number to listen on
    pub port: u16,
}

impl Default for Listener {
    fn default() -> Self {
        Listener {
            host: "0.0.0.0".into(),
            port: 3000,
        }
    }
}

impl Listener {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        Ok(())
    }
}

/// Cross-origin access for browser clients
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct CorsConfig {
    pub allowed_origin: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        CorsConfig {
            allowed_origin: DEFAULT_ALLOWED_ORIGIN.into(),
        }
    }
}

impl CorsConfig {
    pub fn allowed_origin(&self) -> Result<HeaderValue, ValidationError> {
        if self.allowed_origin.is_empty() {
            return Err(ValidationError::InvalidOrigin(self.allowed_origin.clone()));
        }
        HeaderValue::from_str(&self.allowed_origin)
            .map_err(|_| ValidationError::InvalidOrigin(self.allowed_origin.clone()))
    }
}
