use dispatcher::config::{CmsConfig, DispatchConfig};
use serde::Deserialize;
use std::fs::File;
use std::path::Path;
use webhook::config::{Config as WebhookConfig, CorsConfig, Listener};

const API_TOKEN_ENV: &str = "WEBFLOW_API_KEY";
const COLLECTION_ID_ENV: &str = "WEBFLOW_COLLECTION_ID";
const PORT_ENV: &str = "PORT";

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct MetricsConfig {
    pub statsd_host: String,
    pub statsd_port: u16,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`
    #[serde(default = "default_log_level")]
    pub level: String,
    pub sentry_dsn: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct CommonConfig {
    pub metrics: Option<MetricsConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Config {
    #[serde(flatten)]
    pub common: CommonConfig,
    #[serde(default)]
    pub listener: Listener,
    #[serde(default)]
    pub cors: CorsConfig,
    pub cms: CmsConfig,
    #[serde(default)]
    pub dispatch: DispatchConfig,
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let data = serde_yaml::from_reader(file)?;

        Ok(data)
    }

    /// Loads the file, applies environment overrides and validates the result.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(path)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Secrets and deployment specific values may come from the environment
    /// instead of the file. Environment values take precedence.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup(API_TOKEN_ENV) {
            self.cms.api_token = Some(token);
        }

        if let Some(collection_id) = lookup(COLLECTION_ID_ENV) {
            self.cms.collection_id = collection_id;
        }

        if let Some(port) = lookup(PORT_ENV) {
            self.listener.port = port
                .parse()
                .map_err(|_| ConfigError::InvalidEnv(PORT_ENV, port))?;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.webhook().validate()?;
        self.cms.validate()?;
        Ok(())
    }

    pub fn webhook(&self) -> WebhookConfig {
        WebhookConfig {
            listener: self.listener.clone(),
            cors: self.cors.clone(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("could not load config from file: {0}")]
    LoadError(#[from] std::io::Error),
    #[error("could not parse config: {0}")]
    ParseError(#[from] serde_yaml::Error),
    #[error("invalid value for {0}: {1}")]
    InvalidEnv(&'static str, String),
    #[error("invalid server config: {0}")]
    Server(#[from] webhook::config::ValidationError),
    #[error("invalid CMS config: {0}")]
    Cms(#[from] dispatcher::config::ValidationError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn write_tmp_file(s: &str) -> tempfile::NamedTempFile {
        let mut tmp = tempfile::NamedTempFile::new().expect("create temp file");
        write!(tmp, "{}", s).expect("write yaml");

        tmp
    }

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn full_config() {
        let yaml = r#"
            listener:
                host: 127.0.0.1
                port: 8080
            cors:
                allowed_origin: https://list.example.com
            cms:
                api_base_url: http://127.0.0.1:9000/v2
                collection_id: coll1
                api_token: secret
                timeout_secs: 10
            dispatch:
                pacing_interval_ms: 250
            logging:
                level: debug
                sentry_dsn: https://key@sentry.example.com/1
            metrics:
                statsd_host: 127.0.0.1
                statsd_port: 8125
            "#;
        let tmp = write_tmp_file(yaml);
        let config = Config::from_file(tmp.path()).expect("load config");

        assert!(config.validate().is_ok());
        assert_eq!(config.listener.port, 8080);
        assert_eq!(config.cors.allowed_origin, "https://list.example.com");
        assert_eq!(config.cms.api_base_url.as_str(), "http://127.0.0.1:9000/v2");
        assert_eq!(config.cms.timeout_secs, 10);
        assert_eq!(config.dispatch.pacing_interval_ms, 250);

        let logging = config.common.logging.expect("logging config");
        assert_eq!(logging.level, "debug");
        assert!(logging.sentry_dsn.is_some());

        let metrics = config.common.metrics.expect("metrics config");
        assert_eq!(metrics.statsd_port, 8125);
    }

    #[test]
    fn minimal_config_uses_defaults() {
        let tmp = write_tmp_file("cms:\n    collection_id: coll1\n");
        let config = Config::from_file(tmp.path()).expect("load config");

        assert_eq!(config.listener, Listener::default());
        assert_eq!(config.cors, CorsConfig::default());
        assert_eq!(config.dispatch.pacing_interval_ms, 1000);
        assert_eq!(config.common, CommonConfig::default());

        // Token has to come from somewhere
        assert!(matches!(
            config.validate().unwrap_err(),
            ConfigError::Cms(dispatcher::config::ValidationError::MissingApiToken)
        ));
    }

    #[test]
    fn env_overrides() {
        let tmp = write_tmp_file("cms:\n    collection_id: from-file\n    api_token: from-file\n");
        let mut config = Config::from_file(tmp.path()).expect("load config");

        config
            .apply_env(env(&[
                ("WEBFLOW_API_KEY", "from-env"),
                ("WEBFLOW_COLLECTION_ID", "coll-env"),
                ("PORT", "4000"),
            ]))
            .expect("apply env");

        assert_eq!(config.cms.api_token.as_deref(), Some("from-env"));
        assert_eq!(config.cms.collection_id, "coll-env");
        assert_eq!(config.listener.port, 4000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn invalid_port_env() {
        let tmp = write_tmp_file("cms:\n    collection_id: coll1\n");
        let mut config = Config::from_file(tmp.path()).expect("load config");

        let err = config.apply_env(env(&[("PORT", "http")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv("PORT", _)));
    }

    #[test]
    fn load_errors() {
        assert!(matches!(
            Config::from_file(Path::new("/nonexistent/itemsync.yaml")).unwrap_err(),
            ConfigError::LoadError(_)
        ));

        let tmp = write_tmp_file("listener: {host: 0.0.0.0, port: nope}\ncms: {collection_id: c}\n");
        assert!(matches!(
            Config::from_file(tmp.path()).unwrap_err(),
            ConfigError::ParseError(_)
        ));
    }
}
