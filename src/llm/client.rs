use super::retry::{AttemptError, RetryPolicy};
use crate::{Error, Result, config::InferenceConfig};
use async_trait::async_trait;
use reqwest::{
    Client, StatusCode,
    header::{ACCEPT, CONTENT_TYPE},
};
use std::time::Duration;
use tracing::debug;

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// A single call to the inference service, already serialized.
#[derive(Debug, Clone, PartialEq)]
pub struct InvokeModelRequest {
    pub model_id: String,
    pub content_type: String,
    pub accept: String,
    pub body: Vec<u8>,
}

impl InvokeModelRequest {
    pub fn json(model_id: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            model_id: model_id.into(),
            content_type: JSON_CONTENT_TYPE.to_string(),
            accept: JSON_CONTENT_TYPE.to_string(),
            body,
        }
    }
}

/// Synchronous (request/response) access to a hosted model. Every failure
/// is reported as [`Error::Invocation`] carrying the upstream message.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InferenceClient: Send + Sync {
    async fn invoke_model(&self, request: InvokeModelRequest) -> Result<Vec<u8>>;
}

pub struct BedrockClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
    retry: RetryPolicy,
}

impl BedrockClient {
    pub fn new(config: &InferenceConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.bearer_token().map(str::to_string),
            retry: RetryPolicy::from(&config.retry),
        })
    }

    fn invoke_url(&self, model_id: &str) -> String {
        format!("{}/model/{}/invoke", self.base_url, model_id)
    }

    async fn attempt(
        &self,
        url: &str,
        request: &InvokeModelRequest,
    ) -> std::result::Result<Vec<u8>, AttemptError<Error>> {
        let mut builder = self
            .http
            .post(url)
            .header(CONTENT_TYPE, &request.content_type)
            .header(ACCEPT, &request.accept)
            .body(request.body.clone());

        if let Some(ref api_key) = self.api_key {
            builder = builder.bearer_auth(api_key);
        }

        let response = builder.send().await.map_err(|e| {
            let transient = e.is_timeout() || e.is_connect();
            let err = Error::invocation(e.to_string());
            if transient {
                AttemptError::Transient(err)
            } else {
                AttemptError::Permanent(err)
            }
        })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| AttemptError::Transient(Error::invocation(e.to_string())))?;

        if status.is_success() {
            return Ok(body.to_vec());
        }

        let message = upstream_message(&body);
        let err = if message.is_empty() {
            Error::invocation(status.to_string())
        } else {
            Error::invocation(format!("{}: {}", status, message))
        };
        if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            Err(AttemptError::Transient(err))
        } else {
            Err(AttemptError::Permanent(err))
        }
    }
}

#[async_trait]
impl InferenceClient for BedrockClient {
    async fn invoke_model(&self, request: InvokeModelRequest) -> Result<Vec<u8>> {
        let url = self.invoke_url(&request.model_id);

        debug!(
            model_id = %request.model_id,
            body_len = request.body.len(),
            "Invoking model"
        );

        let request = &request;
        let url = url.as_str();
        self.retry
            .run("invoke_model", move || self.attempt(url, request))
            .await
    }
}

/// Pulls the human-readable message out of an error response body, falling
/// back to the raw text.
fn upstream_message(body: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .or_else(|| value.get("Message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| String::from_utf8_lossy(body).trim().to_string())
}
