use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use url::Url;

const DEFAULT_API_BASE_URL: &str = "https://api.webflow.com/v2";

#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("collection id cannot be empty")]
    EmptyCollectionId,

    #[error("API token is not configured")]
    MissingApiToken,

    #[error("API base URL cannot be a base: {0}")]
    InvalidBaseUrl(String),
}

/// Remote CMS write API configuration
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct CmsConfig {
    /// Base URL of the write API, without a trailing collection path
    #[serde(default = "default_api_base_url")]
    pub api_base_url: Url,
    /// Collection whose items are updated
    pub collection_id: String,
    /// Bearer token. Usually supplied through the environment instead of the file.
    #[serde(default)]
    pub api_token: Option<String>,
    /// Value of the `Accept-Version` header
    #[serde(default = "default_accept_version")]
    pub accept_version: String,
    /// Timeout for a single write, including reading the response body
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl CmsConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.collection_id.is_empty() {
            return Err(ValidationError::EmptyCollectionId);
        }

        if self.api_token.as_deref().is_none_or(str::is_empty) {
            return Err(ValidationError::MissingApiToken);
        }

        if self.api_base_url.cannot_be_a_base() {
            return Err(ValidationError::InvalidBaseUrl(
                self.api_base_url.to_string(),
            ));
        }

        Ok(())
    }
}

/// Pacing of successive remote writes within one dispatch call
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct DispatchConfig {
    /// Delay after each successful write, in milliseconds
    #[serde(default = "default_pacing_interval_ms")]
    pub pacing_interval_ms: u64,
}

impl DispatchConfig {
    pub fn pacing_interval(&self) -> Duration {
        Duration::from_millis(self.pacing_interval_ms)
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        DispatchConfig {
            pacing_interval_ms: default_pacing_interval_ms(),
        }
    }
}

fn default_api_base_url() -> Url {
    Url::parse(DEFAULT_API_BASE_URL).expect("default API base URL is valid")
}

fn default_accept_version() -> String {
    "1.0.0".into()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_pacing_interval_ms() -> u64 {
    1000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cms_defaults() {
        let yaml = r#"
collection_id: "6500aa"
api_token: secret
"#;
        let config: CmsConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.api_base_url.as_str(), "https://api.webflow.com/v2");
        assert_eq!(config.accept_version, "1.0.0");
        assert_eq!(config.timeout_secs, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cms_validation_errors() {
        let base = CmsConfig {
            api_base_url: default_api_base_url(),
            collection_id: "6500aa".into(),
            api_token: Some("secret".into()),
            accept_version: default_accept_version(),
            timeout_secs: 30,
        };

        let mut config = base.clone();
        config.collection_id = "".into();
        assert_eq!(config.validate(), Err(ValidationError::EmptyCollectionId));

        let mut config = base.clone();
        config.api_token = None;
        assert_eq!(config.validate(), Err(ValidationError::MissingApiToken));

        let mut config = base.clone();
        config.api_token = Some("".into());
        assert_eq!(config.validate(), Err(ValidationError::MissingApiToken));

        let mut config = base;
        config.api_base_url = Url::parse("mailto:ops@example.com").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn test_dispatch_defaults() {
        let config: DispatchConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, DispatchConfig::default());
        assert_eq!(config.pacing_interval(), Duration::from_millis(1000));
    }
}
