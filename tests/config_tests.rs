use interview_relay::{
    config::{self, ConfigSource, PromptSource},
    relay::RelaySettings,
};
use pretty_assertions::assert_eq;

mod common;
use common::{INVALID_CONFIG_YAML, MINIMAL_CONFIG_YAML, SAMPLE_CONFIG_YAML};

#[test]
fn test_parse_full_config() {
    let config = config::parse(SAMPLE_CONFIG_YAML).unwrap();

    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 3000);
    assert_eq!(config.server.timeout_secs, 60);
    assert_eq!(config.server.logs.level, "debug");

    assert_eq!(config.inference.base_url, "http://localhost:4566");
    assert_eq!(config.inference.model_id, "amazon.nova-lite-v1:0");
    assert_eq!(config.inference.max_tokens, 500);
    assert!(!config.inference.include_system_prompt);
    assert_eq!(config.inference.retry.max_retries, 2);
    assert_eq!(config.inference.retry.initial_backoff_ms, 50);
    // Unset fields keep their defaults
    assert_eq!(config.inference.retry.max_backoff_ms, 2000);

    assert_eq!(config.relay.prompt_source, PromptSource::TopLevel);
    assert_eq!(config.relay.response_path, "messages[0].content[0].text");
    assert!(config.relay.strict_extraction);
    assert_eq!(config.relay.validation_status, 400);

    assert!(config.validate().is_ok());
}

#[test]
fn test_minimal_config_fills_defaults() {
    let config = config::parse(MINIMAL_CONFIG_YAML).unwrap();

    assert_eq!(config.inference.api_key.as_deref(), Some("abc"));
    assert_eq!(config.inference.model_id, "amazon.nova-micro-v1:0");
    assert_eq!(
        config.inference.base_url,
        "https://bedrock-runtime.us-east-1.amazonaws.com"
    );
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.relay.prompt_source, PromptSource::Auto);
}

#[test]
fn test_invalid_config_rejected() {
    assert!(config::parse(INVALID_CONFIG_YAML).is_err());
}

#[tokio::test]
async fn test_config_file_round_trip_into_settings() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    tokio::fs::write(&path, SAMPLE_CONFIG_YAML).await.unwrap();

    let contents = tokio::fs::read_to_string(&path).await.unwrap();
    let config = config::parse(&contents).unwrap();
    let settings = RelaySettings::from_config(&config).unwrap();

    assert_eq!(settings.payload.model_id(), "amazon.nova-lite-v1:0");
    assert_eq!(settings.validation_status, 400);
    assert!(settings.strict_extraction);
}

#[test]
fn test_validation_rejects_zero_max_tokens() {
    let mut config = config::parse(MINIMAL_CONFIG_YAML).unwrap();
    config.inference.max_tokens = 0;

    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("max_tokens"));
}

#[tokio::test]
async fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    tokio::fs::write(&path, SAMPLE_CONFIG_YAML).await.unwrap();
    let path = path.to_str().unwrap();

    let (config, source) = config::load_from(path, None).await.unwrap();

    assert_eq!(source, ConfigSource::File(path.to_string()));
    assert_eq!(config.server.port, 3000);
    assert_eq!(config.inference.api_key, None);
}

#[tokio::test]
async fn test_load_missing_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.yaml");
    let path = path.to_str().unwrap();

    let (config, source) = config::load_from(path, None).await.unwrap();

    assert_eq!(source, ConfigSource::Defaults(path.to_string()));
    assert_eq!(
        source.to_string(),
        format!("Configuration file {} not found, using defaults", path)
    );
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.inference.model_id, "amazon.nova-micro-v1:0");
}

#[tokio::test]
async fn test_load_api_key_override() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    tokio::fs::write(&path, MINIMAL_CONFIG_YAML).await.unwrap();

    let (config, _) = config::load_from(path.to_str().unwrap(), Some("from-env".to_string()))
        .await
        .unwrap();

    assert_eq!(config.inference.api_key.as_deref(), Some("from-env"));
}

#[tokio::test]
async fn test_load_rejects_malformed_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    tokio::fs::write(&path, INVALID_CONFIG_YAML).await.unwrap();

    assert!(config::load_from(path.to_str().unwrap(), None).await.is_err());
}

// The only test in this binary that touches the environment.
#[tokio::test]
async fn test_load_reads_environment() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    tokio::fs::write(&path, MINIMAL_CONFIG_YAML).await.unwrap();

    // SAFETY: no other test in this binary reads or writes these variables.
    unsafe {
        std::env::set_var("CONFIG_PATH", &path);
        std::env::set_var("INFERENCE_API_KEY", "env-key");
    }

    let (config, source) = config::load().await.unwrap();

    assert_eq!(source, ConfigSource::File(path.to_str().unwrap().to_string()));
    assert_eq!(config.inference.api_key.as_deref(), Some("env-key"));

    unsafe {
        std::env::remove_var("CONFIG_PATH");
        std::env::remove_var("INFERENCE_API_KEY");
    }
}
