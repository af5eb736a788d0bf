mod client;
pub mod retry;
mod sdk_client;
mod types;

#[cfg(test)]
pub use client::MockInferenceClient;
pub use client::{BedrockClient, InferenceClient, InvokeModelRequest, JSON_CONTENT_TYPE};
pub use sdk_client::BedrockSdkClient;
pub use types::*;

use crate::{Result, config::InferenceConfig};
use std::sync::Arc;
use tracing::info;

/// Builds the inference client for this configuration: bearer-token auth
/// when an API key is set, SigV4-signed AWS SDK calls otherwise.
pub async fn connect(config: &InferenceConfig) -> Result<Arc<dyn InferenceClient>> {
    if config.bearer_token().is_some() {
        info!(base_url = %config.base_url, "Using bearer-token inference client");
        return Ok(Arc::new(BedrockClient::new(config)?));
    }

    info!(
        region = %config.region,
        endpoint = config.endpoint_override().unwrap_or("default"),
        "Using AWS SDK inference client"
    );
    Ok(Arc::new(BedrockSdkClient::from_env(config).await?))
}
