mod types;

pub use types::*;

use crate::{Error, Result, relay::ResponsePath};
use std::{env, fmt, io::ErrorKind};

pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Where a loaded configuration came from. `load` runs before logging is
/// set up, so the caller reports this once the subscriber exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(String),
    /// The file was not found and built-in defaults were used.
    Defaults(String),
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "Configuration loaded from {}", path),
            Self::Defaults(path) => {
                write!(f, "Configuration file {} not found, using defaults", path)
            }
        }
    }
}

/// Loads configuration from `CONFIG_PATH` (default `config.yaml`), with
/// `INFERENCE_API_KEY` overriding `inference.api_key`.
pub async fn load() -> Result<(Config, ConfigSource)> {
    let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    load_from(&config_path, env::var("INFERENCE_API_KEY").ok()).await
}

pub async fn load_from(
    config_path: &str,
    api_key: Option<String>,
) -> Result<(Config, ConfigSource)> {
    let (mut config, source) = match tokio::fs::read_to_string(config_path).await {
        Ok(config_str) => (
            parse(&config_str)?,
            ConfigSource::File(config_path.to_string()),
        ),
        Err(e) if e.kind() == ErrorKind::NotFound => (
            Config::default(),
            ConfigSource::Defaults(config_path.to_string()),
        ),
        Err(e) => return Err(e.into()),
    };

    if let Some(api_key) = api_key {
        config.inference.api_key = Some(api_key);
    }

    config.validate()?;
    Ok((config, source))
}

pub fn parse(config_str: &str) -> Result<Config> {
    // An empty file deserializes to unit, not an empty mapping
    if config_str.trim().is_empty() {
        return Ok(Config::default());
    }
    Ok(serde_yaml::from_str(config_str)?)
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        let inference = &self.inference;
        if inference.model_id.trim().is_empty() {
            return Err(Error::config("inference.model_id must not be empty"));
        }
        if inference.bearer_token().is_none() && inference.region.trim().is_empty() {
            return Err(Error::config(
                "inference.region must be set when no api_key is configured",
            ));
        }
        if inference.max_tokens == 0 {
            return Err(Error::config("inference.max_tokens must be greater than 0"));
        }
        if !(0.0..=1.0).contains(&inference.temperature) {
            return Err(Error::config(format!(
                "inference.temperature must be within [0, 1], got {}",
                inference.temperature
            )));
        }
        if inference.retry.backoff_multiplier < 1.0 {
            return Err(Error::config(
                "inference.retry.backoff_multiplier must be at least 1.0",
            ));
        }
        if !(400..=599).contains(&self.relay.validation_status) {
            return Err(Error::config(format!(
                "relay.validation_status must be an HTTP error status, got {}",
                self.relay.validation_status
            )));
        }
        self.relay.response_path.parse::<ResponsePath>()?;
        Ok(())
    }
}
