//! The prompt relay pipeline.
//!
//! Normalize → (preflight short-circuit) → validate → build payload →
//! invoke → extract → format. Failures at any stage become an error
//! envelope; only a failure to encode that envelope's body escapes.

mod extract;
mod payload;
mod request;
mod response;

pub use extract::ResponsePath;
pub use payload::{DEFAULT_SYSTEM_PROMPT, PayloadBuilder};
pub use request::{IncomingRequest, Prompt};
pub use response::*;

use crate::{
    Error, Result,
    config::{Config, PromptSource},
    llm::{InferenceClient, InvokeModelRequest, InvocationPayload},
};
use std::sync::Arc;
use tracing::{Instrument, debug, error, info, info_span};
use uuid::Uuid;

/// Per-process relay behaviour, fixed at startup.
#[derive(Debug, Clone)]
pub struct RelaySettings {
    pub payload: PayloadBuilder,
    pub prompt_source: PromptSource,
    pub response_path: ResponsePath,
    pub strict_extraction: bool,
    pub validation_status: u16,
}

impl RelaySettings {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            payload: PayloadBuilder::from_config(&config.inference),
            prompt_source: config.relay.prompt_source,
            response_path: config.relay.response_path.parse()?,
            strict_extraction: config.relay.strict_extraction,
            validation_status: config.relay.validation_status,
        })
    }
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            payload: PayloadBuilder::from_config(&Default::default()),
            prompt_source: PromptSource::default(),
            response_path: ResponsePath::default(),
            strict_extraction: false,
            validation_status: 500,
        }
    }
}

pub struct Relay {
    client: Arc<dyn InferenceClient>,
    settings: RelaySettings,
}

impl Relay {
    pub fn new(client: Arc<dyn InferenceClient>, settings: RelaySettings) -> Self {
        Self { client, settings }
    }

    pub fn settings(&self) -> &RelaySettings {
        &self.settings
    }

    /// Runs one invocation end to end.
    ///
    /// Returns `Err` only when the outgoing body itself cannot be encoded.
    pub async fn handle(&self, request: IncomingRequest) -> Result<OutgoingResponse> {
        let span = info_span!(
            "invocation",
            request_id = %Uuid::new_v4(),
            method = request.method().unwrap_or("-"),
        );

        async move {
            info!("Starting invocation");

            if request.is_preflight() {
                info!("Preflight request, skipping model invocation");
                return Ok(OutgoingResponse::preflight());
            }

            let outcome = self
                .generate(&request)
                .await
                .and_then(|text| OutgoingResponse::success(&text));
            let response = self.envelope(outcome)?;

            info!(status_code = response.status_code, "Ending invocation");
            Ok(response)
        }
        .instrument(span)
        .await
    }

    async fn generate(&self, request: &IncomingRequest) -> Result<String> {
        let prompt = request.prompt(self.settings.prompt_source).inspect_err(|e| {
            info!("Rejected request: {}", e);
        })?;
        debug!(prompt_len = prompt.as_str().len(), "Prompt accepted");

        let payload = self.settings.payload.build(&prompt);
        self.call_model(&payload)
            .await
            .map_err(|e| Error::invocation(format!("Error invoking model: {}", e)))
    }

    async fn call_model(&self, payload: &InvocationPayload) -> Result<String> {
        let request = InvokeModelRequest::json(payload.model_id.clone(), payload.to_bytes()?);
        let raw = self.client.invoke_model(request).await?;

        debug!(
            response = %String::from_utf8_lossy(&raw),
            "Response from model"
        );

        let text = self
            .settings
            .response_path
            .extract(&raw, self.settings.strict_extraction)?;
        info!(response_len = text.len(), "Parsed model response");
        Ok(text)
    }

    /// Turns any pipeline failure into an error envelope. Only encoding the
    /// error body itself can fail here.
    fn envelope(&self, outcome: Result<OutgoingResponse>) -> Result<OutgoingResponse> {
        outcome.or_else(|e| {
            error!("Error processing request: {}", e);
            OutgoingResponse::error(self.status_for(&e), &e.to_string())
        })
    }

    fn status_for(&self, error: &Error) -> u16 {
        match error {
            Error::Validation(_) => self.settings.validation_status,
            _ => 500,
        }
    }
}
