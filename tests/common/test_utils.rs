use super::mocks::MockInferenceClient;
use interview_relay::{
    config::{Config, InferenceConfig},
    relay::{IncomingRequest, Relay, RelaySettings},
};
use serde_json::{Value, json};
use std::sync::Arc;

/// Body of a successful Nova `invoke` response.
pub fn nova_response(text: &str) -> Vec<u8> {
    json!({
        "output": {
            "message": {
                "role": "assistant",
                "content": [{ "text": text }]
            }
        },
        "stopReason": "end_turn",
        "usage": { "inputTokens": 812, "outputTokens": 64, "totalTokens": 876 }
    })
    .to_string()
    .into_bytes()
}

/// Body in the alternate `messages[0].content[0].text` layout.
pub fn messages_response(text: &str) -> Vec<u8> {
    json!({ "messages": [{ "role": "assistant", "content": [{ "text": text }] }] })
        .to_string()
        .into_bytes()
}

/// POST event whose `body` is JSON text carrying the prompt.
pub fn post_event(prompt: &str) -> IncomingRequest {
    IncomingRequest::new("POST", json!({ "prompt": prompt }).to_string())
}

/// Builds a relay around the mock and hands back a handle for inspection.
pub fn create_relay(client: MockInferenceClient) -> (Relay, Arc<MockInferenceClient>) {
    create_relay_with(client, RelaySettings::default())
}

pub fn create_relay_with(
    client: MockInferenceClient,
    settings: RelaySettings,
) -> (Relay, Arc<MockInferenceClient>) {
    let client = Arc::new(client);
    (Relay::new(client.clone(), settings), client)
}

/// Inference config pointing at a local mock server.
pub fn local_inference_config(base_url: &str) -> InferenceConfig {
    InferenceConfig {
        base_url: base_url.to_string(),
        api_key: Some("test-api-key".to_string()),
        request_timeout_secs: 5,
        ..Default::default()
    }
}

pub fn create_test_config() -> Config {
    let mut config = Config::default();
    config.server.host = "127.0.0.1".to_string();
    config.server.logs.level = "debug".to_string();
    config
}

/// Decodes the JSON body of an envelope.
pub fn body_json(body: &str) -> Value {
    serde_json::from_str(body).expect("envelope body should be JSON")
}

pub const SAMPLE_CONFIG_YAML: &str = r#"
server:
  host: "127.0.0.1"
  port: 3000
  timeout_secs: 60
  logs:
    level: "debug"

inference:
  base_url: "http://localhost:4566"
  model_id: "amazon.nova-lite-v1:0"
  max_tokens: 500
  temperature: 0.5
  include_system_prompt: false
  retry:
    max_retries: 2
    initial_backoff_ms: 50

relay:
  prompt_source: top_level
  response_path: "messages[0].content[0].text"
  strict_extraction: true
  validation_status: 400
"#;

pub const MINIMAL_CONFIG_YAML: &str = r#"
inference:
  api_key: "abc"
"#;

pub const INVALID_CONFIG_YAML: &str = r#"
server:
  port: "not-a-number"
relay:
  prompt_source: "query_string"
"#;
