use super::{
    client::{InferenceClient, InvokeModelRequest},
    retry::{AttemptError, RetryPolicy},
};
use crate::{Error, Result, config::InferenceConfig};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::provider::ProvideCredentials;
use aws_sdk_bedrockruntime::{
    Client,
    config::{Builder, retry::RetryConfig as SdkRetryConfig, timeout::TimeoutConfig},
    error::{DisplayErrorContext, ProvideErrorMetadata, SdkError},
    operation::invoke_model::InvokeModelError,
    primitives::Blob,
};
use std::time::Duration;
use tracing::debug;

/// Bedrock runtime client that signs requests with AWS credentials (SigV4).
pub struct BedrockSdkClient {
    client: Client,
    retry: RetryPolicy,
}

impl BedrockSdkClient {
    /// Resolves credentials through the default provider chain (environment,
    /// profile, web identity, container and instance metadata). Fails when
    /// none are available.
    pub async fn from_env(config: &InferenceConfig) -> Result<Self> {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .load()
            .await;

        let provider = sdk_config
            .credentials_provider()
            .ok_or_else(|| Error::config("no AWS credentials provider available"))?;
        provider.provide_credentials().await.map_err(|e| {
            Error::config(format!(
                "AWS credentials unavailable: {}",
                DisplayErrorContext(&e)
            ))
        })?;

        Ok(Self::from_sdk_config(&sdk_config, config))
    }

    pub fn from_sdk_config(sdk_config: &SdkConfig, config: &InferenceConfig) -> Self {
        // Retrying is owned by `RetryPolicy`
        let mut builder = Builder::from(sdk_config)
            .retry_config(SdkRetryConfig::disabled())
            .timeout_config(
                TimeoutConfig::builder()
                    .operation_timeout(Duration::from_secs(config.request_timeout_secs))
                    .build(),
            );
        if let Some(endpoint) = config.endpoint_override() {
            builder = builder.endpoint_url(endpoint);
        }

        Self {
            client: Client::from_conf(builder.build()),
            retry: RetryPolicy::from(&config.retry),
        }
    }

    async fn attempt(
        &self,
        request: &InvokeModelRequest,
    ) -> std::result::Result<Vec<u8>, AttemptError<Error>> {
        self.client
            .invoke_model()
            .model_id(&request.model_id)
            .content_type(&request.content_type)
            .accept(&request.accept)
            .body(Blob::new(request.body.clone()))
            .send()
            .await
            .map(|output| output.body.into_inner())
            .map_err(classify)
    }
}

#[async_trait]
impl InferenceClient for BedrockSdkClient {
    async fn invoke_model(&self, request: InvokeModelRequest) -> Result<Vec<u8>> {
        debug!(
            model_id = %request.model_id,
            body_len = request.body.len(),
            "Invoking model with signed request"
        );

        let request = &request;
        self.retry
            .run("invoke_model", move || self.attempt(request))
            .await
    }
}

/// Same rules as the bearer-token client: throttling, 5xx and transport
/// failures may be retried.
fn classify(err: SdkError<InvokeModelError>) -> AttemptError<Error> {
    let transient = match &err {
        SdkError::TimeoutError(_) | SdkError::DispatchFailure(_) => true,
        _ => err.raw_response().is_some_and(|raw| {
            let status = raw.status().as_u16();
            status == 429 || (500..600).contains(&status)
        }),
    };

    let message = match (err.code(), err.message()) {
        (Some(code), Some(message)) => format!("{}: {}", code, message),
        (Some(code), None) => code.to_string(),
        _ => DisplayErrorContext(&err).to_string(),
    };

    if transient {
        AttemptError::Transient(Error::invocation(message))
    } else {
        AttemptError::Permanent(Error::invocation(message))
    }
}
